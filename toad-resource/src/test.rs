#![allow(dead_code)]

use core::cell::RefCell;

use no_std_net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use toad_msg::{Code, Id, MessageOptions, Payload, Token, TryFromBytes, Type};

use crate::link_format::CoreLinkFormat;
use crate::net::{Addrd, Protocol, Transport};
use crate::platform;
use crate::resource::Handler;
use crate::server::Server;

/// Test platform: `Vec`s everywhere, handlers are plain fn pointers
pub(crate) type Platform = platform::Alloc<TestHandler>;

pub(crate) type Message = platform::Message<Platform>;

#[derive(Clone, Copy, Debug)]
pub(crate) struct TestHandler(pub fn(Addrd<&Message>) -> Option<Addrd<Message>>);

impl Handler<Platform> for TestHandler {
  fn handle(&mut self, req: Addrd<&Message>) -> Option<Addrd<Message>> {
    (self.0)(req)
  }
}

/// Transport that remembers every datagram it was asked to send
#[derive(Debug, Default)]
pub(crate) struct TransportMock {
  pub sent: RefCell<Vec<Addrd<Vec<u8>>>>,
}

impl TransportMock {
  pub fn new() -> Self {
    Default::default()
  }
}

impl Transport for TransportMock {
  type Error = ();

  fn send(&self, _: Protocol, msg: Addrd<&[u8]>) -> nb::Result<(), Self::Error> {
    self.sent.borrow_mut().push(msg.map(|bytes| bytes.to_vec()));
    Ok(())
  }
}

pub(crate) fn dummy_addr() -> SocketAddr {
  SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::new(192, 168, 0, 1), 8080))
}

/// A CONfirmable message with a fixed id & token, addressed from
/// [`dummy_addr`]
pub(crate) fn req(code: Code, path: &str) -> Addrd<Message> {
  let mut req = req_no_path(code);
  req.data_mut().set_path(path).unwrap();
  req
}

pub(crate) fn req_no_path(code: Code) -> Addrd<Message> {
  let msg = toad_msg::Message { ty: Type::Con,
                                id: Id(0x0102),
                                token: Token([0xde, 0xad].into_iter().collect()),
                                ver: Default::default(),
                                code,
                                opts: Default::default(),
                                payload: Payload(Default::default()) };

  Addrd(msg, dummy_addr())
}

/// Everything the mock transport sent, parsed back into messages
pub(crate) fn sent(transport: &TransportMock) -> Vec<Addrd<Message>> {
  transport.sent
           .borrow()
           .iter()
           .map(|Addrd(bytes, addr)| Addrd(Message::try_from_bytes(bytes).unwrap(), *addr))
           .collect()
}

pub(crate) fn server() -> Server<Platform, TransportMock, CoreLinkFormat> {
  Server::new(TransportMock::new(), CoreLinkFormat)
}
