use std::io;
use std::net::UdpSocket;

use crate::net::{Addrd, Protocol, Transport};

fn std_addr(addr: no_std_net::SocketAddr) -> std::net::SocketAddr {
  use no_std_net::SocketAddr::*;

  match addr {
    | V4(a) => std::net::SocketAddr::V4(std::net::SocketAddrV4::new(a.ip().octets().into(),
                                                                    a.port())),
    | V6(a) => std::net::SocketAddr::V6(std::net::SocketAddrV6::new(a.ip().octets().into(),
                                                                    a.port(),
                                                                    a.flowinfo(),
                                                                    a.scope_id())),
  }
}

impl Transport for UdpSocket {
  type Error = io::Error;

  fn send(&self, _: Protocol, msg: Addrd<&[u8]>) -> nb::Result<(), Self::Error> {
    self.send_to(msg.data(), std_addr(msg.addr()))
        .map(|_| ())
        .map_err(|e| match e.kind() {
          | io::ErrorKind::WouldBlock => nb::Error::WouldBlock,
          | _ => nb::Error::Other(e),
        })
  }
}
