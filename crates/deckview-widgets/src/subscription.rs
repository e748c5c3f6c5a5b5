//! Bridge from `std::sync::mpsc` receivers to iced subscriptions
//!
//! Background workers (the analyzer, track loaders) report through plain
//! mpsc channels. [`channel_subscription`] polls such a receiver from the
//! iced runtime and yields every item as a message.
//!
//! ```ignore
//! fn subscription(&self) -> Subscription<Message> {
//!     channel_subscription(self.analyzer.events()).map(Message::Analyzer)
//! }
//! ```

use std::any::TypeId;
use std::hash::Hash;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use iced::advanced::subscription::{self, EventStream, Hasher, Recipe};
use iced::futures::stream::{self, BoxStream};
use iced::Subscription;

/// Pause between polls of an empty channel
const POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Shared receiver end of a worker channel
pub type SharedReceiver<T> = Arc<Mutex<Receiver<T>>>;

struct ChannelRecipe<T> {
    /// Identity of the subscription: address of the shared receiver
    id: usize,
    receiver: SharedReceiver<T>,
}

enum Poll<T> {
    Item(T),
    Empty,
    Closed,
}

fn poll<T>(receiver: &SharedReceiver<T>) -> Poll<T> {
    let Ok(guard) = receiver.lock() else {
        return Poll::Closed;
    };
    match guard.try_recv() {
        Ok(item) => Poll::Item(item),
        Err(TryRecvError::Empty) => Poll::Empty,
        Err(TryRecvError::Disconnected) => Poll::Closed,
    }
}

impl<T: Send + 'static> Recipe for ChannelRecipe<T> {
    type Output = T;

    fn hash(&self, state: &mut Hasher) {
        TypeId::of::<Self>().hash(state);
        self.id.hash(state);
    }

    fn stream(self: Box<Self>, _input: EventStream) -> BoxStream<'static, T> {
        Box::pin(stream::unfold(self.receiver, |receiver| async move {
            loop {
                match poll(&receiver) {
                    Poll::Item(item) => return Some((item, receiver)),
                    Poll::Empty => tokio::time::sleep(POLL_INTERVAL).await,
                    Poll::Closed => {
                        log::debug!("channel_subscription: Sender dropped, ending stream");
                        return None;
                    }
                }
            }
        }))
    }
}

/// Subscription yielding every item sent to `receiver`
///
/// The stream ends once all senders are dropped. Subscriptions created from
/// the same shared receiver are the same subscription.
pub fn channel_subscription<T>(receiver: SharedReceiver<T>) -> Subscription<T>
where
    T: Send + 'static,
{
    let id = Arc::as_ptr(&receiver) as usize;
    subscription::from_recipe(ChannelRecipe { id, receiver })
}
