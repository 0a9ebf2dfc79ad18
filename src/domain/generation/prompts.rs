//! Prompt templates sent to the generative-language API.
//!
//! The reply formats requested here are what `analysis::parser` and
//! `dialogue::parser` read back.

use crate::domain::dialogue::parser::EXPECTED_DIALOGUE_TURNS;

const ANALYSIS_INSTRUCTIONS: &str = r#"Phân tích đoạn văn sau. Nếu có nhiều câu, phân tích từng câu riêng biệt.
Trả về định dạng (chú ý không gửi thêm bất cứ câu thừa, giới thiệu, mô tả, tương tác nào thêm ví dụ: đây là nội dung trả lời...), chỉ trả về đúng kết quả cần, gồm: mỗi câu gốc tiếng Anh, dịch tiếng Việt, phân tích ngữ pháp chi tiết.
Các phần của mỗi câu phân cách bằng "---". Giữa các câu phân cách bằng "===".
Trong phần phân tích ngữ pháp:
- Đánh dấu các cụm từ trong dấu "" cần in đậm bằng ký hiệu ** (ví dụ: **"I love"**).
- Cụm đầu tiên trong "" luôn được in đậm (thêm **).
- Các cụm "" tiếp theo: Nếu bất kỳ từ nào trong cụm trùng với bất kỳ từ nào trong các cụm "" trước đó, không thêm **; nếu không trùng, thêm **.
- Sau mỗi cụm được in đậm, thêm ký hiệu || để đánh dấu xuống dòng.
Ví dụ:

I love learning English.
---
Tôi yêu thích học tiếng Anh.
---
**"I love"** là cấu trúc chủ ngữ + động từ.||**"love learning"** là cụm động từ + danh động từ.||

===

This is a book.
---
Đây là một quyển sách.
---
**"This is"** là cấu trúc...||"#;

const DIALOGUE_RULES: &str = r#"Định dạng phản hồi phải tuân thủ nghiêm ngặt quy tắc sau:

- Mỗi câu là một khối riêng, gồm 3 phần: câu tiếng Anh, dịch tiếng Việt, phân tích ngữ pháp.
- Các phần trong một khối được phân cách bằng dấu "---" (ba dấu gạch ngang, không có khoảng trắng thừa).
- Các khối cách nhau bằng đúng một dòng trống.
- Không bao gồm bất kỳ nội dung nào khác (giới thiệu, mô tả, tên người nói, tiêu đề, hoặc ký tự thừa).
- Mỗi phần (câu, dịch, phân tích) phải có nội dung hợp lệ, không được để trống.

Ví dụ một khối:

I love learning English.
---
Tôi yêu thích học tiếng Anh.
---
"I love" là cấu trúc chủ ngữ + động từ, thể hiện cảm xúc. "Learning English" là danh động từ làm tân ngữ."#;

/// Free-analysis prompt for one merged paragraph
pub fn analysis_prompt(paragraph: &str) -> String {
    format!("{}\n\nĐoạn văn: \"{}\"", ANALYSIS_INSTRUCTIONS, paragraph)
}

/// Dialogue prompt for the whole input text
pub fn dialogue_prompt(text: &str) -> String {
    format!(
        "Dựa trên đoạn văn sau, tạo một đoạn hội thoại tiếng Anh gồm đúng {} câu về chủ đề chính của đoạn văn. \
         Mỗi câu hội thoại phải đi kèm phần dịch tiếng Việt và phân tích chi tiết cấu trúc ngữ pháp, cách sử dụng từ, cụm từ. \
         {}\n\nĐoạn văn: \"{}\"",
        EXPECTED_DIALOGUE_TURNS, DIALOGUE_RULES, text
    )
}
