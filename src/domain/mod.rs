pub mod account;
pub mod amount;
pub mod error;
pub mod movement;
pub mod operation;
pub mod traits;

pub use account::{Account, MAX_DEPOSITS};
pub use error::{AccountError, Error};
pub use movement::{Movement, MovementKind};
pub use operation::Operation;
pub use traits::{Clock, DeadLetterQueue, FixedClock, OperationStream, StatementWriter, SystemClock};
