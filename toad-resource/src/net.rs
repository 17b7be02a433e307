use no_std_net::SocketAddr;

/// Data that came from (or is going to) a network socket
#[derive(PartialEq, PartialOrd, Eq, Ord, Hash, Debug, Clone, Copy)]
pub struct Addrd<T>(pub T, pub SocketAddr);

impl<T> Addrd<T> {
  /// Borrow the contents of this Addressed
  pub fn as_ref(&self) -> Addrd<&T> {
    Addrd(self.data(), self.addr())
  }

  /// Discard the socket and get the data in this Addressed
  pub fn unwrap(self) -> T {
    self.0
  }

  /// Map the data contained in this Addressed
  pub fn map<R>(self, f: impl FnOnce(T) -> R) -> Addrd<R> {
    Addrd(f(self.0), self.1)
  }

  /// Borrow the contents of the addressed item
  pub fn data(&self) -> &T {
    &self.0
  }

  /// Mutably borrow the contents of the addressed item
  pub fn data_mut(&mut self) -> &mut T {
    &mut self.0
  }

  /// Copy the socket address for the data
  pub fn addr(&self) -> SocketAddr {
    self.1
  }

  /// Turn the entire structure into something else
  pub fn fold<R>(self, f: impl FnOnce(T, SocketAddr) -> R) -> R {
    f(self.0, self.1)
  }
}

impl<T> AsMut<T> for Addrd<T> {
  fn as_mut(&mut self) -> &mut T {
    &mut self.0
  }
}

/// The application protocol a datagram belongs to.
///
/// Today everything the server emits is CoAP over whatever the
/// [`Transport`] speaks; the discriminator exists so a transport
/// multiplexing several protocols over one socket can tell traffic
/// apart without sniffing bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[non_exhaustive]
pub enum Protocol {
  /// Plain CoAP
  Coap,
}

/// The server's view of the network: "here are bytes, get them to
/// this address."
///
/// Implementations are expected to be non-blocking. Yielding
/// [`nb::Error::WouldBlock`] tells the server the datagram was not
/// sent; the server holds no state across a send, so the host is free
/// to retry the whole operation later.
///
/// Implemented for [`std::net::UdpSocket`](https://doc.rust-lang.org/std/net/struct.UdpSocket.html)
/// when the `std` feature is enabled.
pub trait Transport {
  /// The error yielded when a datagram cannot be handed to the network
  type Error: core::fmt::Debug;

  /// Send a serialized message to the address it is paired with
  fn send(&self, protocol: Protocol, msg: Addrd<&[u8]>) -> nb::Result<(), Self::Error>;
}
