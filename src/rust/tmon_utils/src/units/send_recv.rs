//! SendRecvOrder keeps a pair of values, one for traffic an address sent
//! and one for traffic it received. Every frame is "send" for its source
//! and "recv" for its destination; keeping the pairing explicit avoids
//! directional mix-ups.

use serde::{Deserialize, Serialize};

/// Which side of a frame an address was on.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// The address was the frame's source.
    Send,
    /// The address was the frame's destination.
    Recv,
}

/// Provides strong send/receive separation for stored statistics.
/// This is a generic type: you can control the type stored inside.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Default, Serialize, Deserialize)]
pub struct SendRecvOrder<T> {
    /// The send value
    pub send: T,
    /// The receive value
    pub recv: T,
}

impl<T> SendRecvOrder<T> {
    /// Mutably borrow the value for one direction.
    pub fn dir_mut(&mut self, direction: Direction) -> &mut T {
        match direction {
            Direction::Send => &mut self.send,
            Direction::Recv => &mut self.recv,
        }
    }

    /// Iterate `(direction, value)` pairs, send first.
    pub fn iter(&self) -> impl Iterator<Item = (Direction, &T)> {
        [(Direction::Send, &self.send), (Direction::Recv, &self.recv)].into_iter()
    }

    /// Apply `f` to both values.
    pub fn for_each_mut(&mut self, mut f: impl FnMut(&mut T)) {
        f(&mut self.send);
        f(&mut self.recv);
    }
}
