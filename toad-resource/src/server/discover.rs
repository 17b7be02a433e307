use toad_msg::{ContentFormat, Message, MessageOptions, Payload, Token, Type};

use super::{Error, ErrorOf, Server};
use crate::code;
use crate::link_format::Linker;
use crate::net::{Addrd, Transport};
use crate::platform::{self, PlatformTypes};

/// The path resource discovery lives at ([RFC 7252 §7.1](https://datatracker.ietf.org/doc/html/rfc7252#section-7.1))
pub const WELLKNOWN_CORE: &[u8] = b".well-known/core";

impl<P, T, R> Server<P, T, R>
  where P: PlatformTypes,
        T: Transport,
        R: Linker<P>
{
  /// Answer a `.well-known/core` request: `2.05 CONTENT`, an ACK
  /// mirroring the request id, Content-Format
  /// `application/link-format`, body from the [`Linker`].
  ///
  /// When the linker cannot produce a listing, nothing is sent.
  pub(super) fn discover(&mut self, req: Addrd<platform::Message<P>>) -> Result<(), ErrorOf<P, T, R>> {
    let body = self.linker.render(self.store.iter()).map_err(Error::Link)?;

    let mut msg: platform::Message<P> = Message { ty: Type::Ack,
                                                  id: req.data().id,
                                                  token: Token(Default::default()),
                                                  ver: Default::default(),
                                                  code: code::CONTENT,
                                                  opts: Default::default(),
                                                  payload: Payload(body) };
    msg.set_content_format(ContentFormat::LinkFormat)
       .map_err(Error::SetOption)?;

    self.send(Addrd(msg, req.addr()))
  }
}

#[cfg(test)]
mod tests {
  use toad_msg::{ContentFormat, MessageOptions, Type};

  use crate::code;
  use crate::method::Method;
  use crate::resource::Access;
  use crate::test;

  type Resource = crate::resource::Resource<test::Platform>;

  #[test]
  fn wellknown_core_lists_the_store_as_link_format() {
    let mut server = test::server();
    server.create(&mut Resource::stored("sensors/temp", Access::GET, "21.5"))
          .unwrap();
    server.create(&mut Resource::stored("sensors/light", Access::GET, "80"))
          .unwrap();

    let req = test::req(Method::GET.code(), ".well-known/core");
    server.process(req.clone()).unwrap();

    let resp = test::sent(server.transport()).pop().unwrap();
    assert_eq!(resp.data().code, code::CONTENT);
    assert_eq!(resp.data().ty, Type::Ack);
    assert_eq!(resp.data().id, req.data().id);
    assert_eq!(resp.data().content_format(), Some(ContentFormat::LinkFormat));
    assert_eq!(&resp.data().payload.0,
               b"</sensors/light>,</sensors/temp>");
  }

  #[test]
  fn wellknown_core_answers_even_an_empty_store() {
    let mut server = test::server();
    server.process(test::req(Method::GET.code(), ".well-known/core"))
          .unwrap();

    let resp = test::sent(server.transport()).pop().unwrap();
    assert_eq!(resp.data().code, code::CONTENT);
    assert!(resp.data().payload.0.is_empty());
  }
}
