use std::future::Future;
use tokio::sync::watch;

/// Generation counter that lets a newer request cancel an older in-flight one.
///
/// Each [`Supersede::begin`] bumps the generation; an [`InFlight`] whose ticket
/// no longer matches stops waiting on its work and reports `None`.
pub struct Supersede {
    generation: watch::Sender<u64>,
}

impl Supersede {
    pub fn new() -> Self {
        let (generation, _) = watch::channel(0);
        Self { generation }
    }

    pub fn begin(&self) -> InFlight {
        self.generation.send_modify(|g| *g += 1);
        let receiver = self.generation.subscribe();
        let ticket = *receiver.borrow();
        InFlight { ticket, receiver }
    }

    /// Cancel whatever is in flight without starting new work
    pub fn cancel(&self) {
        self.generation.send_modify(|g| *g += 1);
    }
}

impl Default for Supersede {
    fn default() -> Self {
        Self::new()
    }
}

pub struct InFlight {
    ticket: u64,
    receiver: watch::Receiver<u64>,
}

impl InFlight {
    /// Drive `work` until it completes or a newer request supersedes this one
    pub async fn run<F>(&mut self, work: F) -> Option<F::Output>
    where
        F: Future,
    {
        let ticket = self.ticket;
        let receiver = &mut self.receiver;
        tokio::select! {
            output = work => Some(output),
            _ = async move {
                let _ = receiver.wait_for(|g| *g != ticket).await;
            } => None,
        }
    }

    pub fn is_current(&self) -> bool {
        *self.receiver.borrow() == self.ticket
    }
}
