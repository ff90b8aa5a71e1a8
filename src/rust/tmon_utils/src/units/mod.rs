mod send_recv;
pub use send_recv::{Direction, SendRecvOrder};
