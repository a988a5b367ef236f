//! Ctrl-C delivery for the terminal loop
//!
//! One listener lives for the whole process and forwards every Ctrl-C over a
//! channel. At the prompt an interrupt ends the session; during a turn it
//! cancels the model call.

use std::future::Future;

use tokio::io::{AsyncBufRead, Lines};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

pub struct Interrupts {
    rx: mpsc::UnboundedReceiver<()>,
}

impl Interrupts {
    /// Install the process-wide Ctrl-C listener
    pub fn listen() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(async move {
            while tokio::signal::ctrl_c().await.is_ok() {
                if tx.send(()).is_err() {
                    break;
                }
            }
            tracing::debug!("Ctrl-C listener stopped");
        });
        Self { rx }
    }

    #[cfg(test)]
    fn from_channel(rx: mpsc::UnboundedReceiver<()>) -> Self {
        Self { rx }
    }

    /// Next interrupt; never resolves once the listener is gone
    async fn recv(&mut self) {
        if self.rx.recv().await.is_none() {
            std::future::pending::<()>().await;
        }
    }

    fn drain(&mut self) {
        while self.rx.try_recv().is_ok() {}
    }

    /// Next input line, or `None` on end of input or Ctrl-C
    pub async fn read_line<R>(&mut self, lines: &mut Lines<R>) -> std::io::Result<Option<String>>
    where
        R: AsyncBufRead + Unpin,
    {
        tokio::select! {
            line = lines.next_line() => line,
            _ = self.recv() => {
                tracing::debug!("Interrupted at prompt");
                Ok(None)
            }
        }
    }

    /// Drive `work` to completion, cancelling `cancel` if Ctrl-C arrives first
    ///
    /// `work` is still awaited after cancellation so it can report how it
    /// ended. Interrupts pressed while it winds down are discarded.
    pub async fn cancel_on_interrupt<F>(
        &mut self,
        cancel: &CancellationToken,
        work: F,
    ) -> F::Output
    where
        F: Future,
    {
        tokio::pin!(work);
        tokio::select! {
            output = &mut work => output,
            _ = self.recv() => {
                cancel.cancel();
                let output = work.await;
                self.drain();
                output
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncBufReadExt, BufReader};

    #[tokio::test]
    async fn test_idle_interrupt_ends_prompt() {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut interrupts = Interrupts::from_channel(rx);
        // Keep the writer half open so reading would block forever
        let (_writer, reader) = tokio::io::duplex(64);
        let mut lines = BufReader::new(reader).lines();

        tx.send(()).unwrap();
        assert_eq!(interrupts.read_line(&mut lines).await.unwrap(), None);

        // A second Ctrl-C at a later prompt is delivered too
        tx.send(()).unwrap();
        assert_eq!(interrupts.read_line(&mut lines).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_lines_pass_through_without_listener() {
        let (tx, rx) = mpsc::unbounded_channel::<()>();
        drop(tx);
        let mut interrupts = Interrupts::from_channel(rx);
        let mut lines = BufReader::new(&b"hello\n"[..]).lines();

        assert_eq!(
            interrupts.read_line(&mut lines).await.unwrap(),
            Some("hello".to_string())
        );
        assert_eq!(interrupts.read_line(&mut lines).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_interrupt_cancels_work() {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut interrupts = Interrupts::from_channel(rx);
        let cancel = CancellationToken::new();

        tx.send(()).unwrap();
        tx.send(()).unwrap();
        let token = cancel.clone();
        let outcome = interrupts
            .cancel_on_interrupt(&cancel, async move {
                token.cancelled().await;
                "cancelled"
            })
            .await;
        assert_eq!(outcome, "cancelled");
        assert!(cancel.is_cancelled());

        // The extra press during the turn does not leak into the next prompt
        let (_writer, reader) = tokio::io::duplex(64);
        let mut lines = BufReader::new(reader).lines();
        let next = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            interrupts.read_line(&mut lines),
        )
        .await;
        assert!(next.is_err());
    }

    #[tokio::test]
    async fn test_work_finishes_without_interrupt() {
        let (_tx, rx) = mpsc::unbounded_channel();
        let mut interrupts = Interrupts::from_channel(rx);
        let cancel = CancellationToken::new();

        let outcome = interrupts.cancel_on_interrupt(&cancel, async { 7 }).await;
        assert_eq!(outcome, 7);
        assert!(!cancel.is_cancelled());
    }
}
