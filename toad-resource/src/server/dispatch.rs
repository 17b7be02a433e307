use toad_msg::{CodeKind, ContentFormat, Message, MessageOptions, Payload, Type};

use super::{discover, Error, ErrorOf, Server};
use crate::code::{self, Code};
use crate::link_format::Linker;
use crate::logging;
use crate::method::Method;
use crate::net::{Addrd, Transport};
use crate::path;
use crate::platform::{self, PlatformTypes};
use crate::resource::{Access, Handler, Kind, Resource};
use crate::store;

/// How a request will be answered, decided before any response
/// bytes exist
enum Routed<P>
  where P: PlatformTypes
{
  /// Answer with `status`; `content` carries the representation &
  /// its format for `2.05`
  Respond {
    status: Option<Code>,
    content: Option<(Option<ContentFormat>, P::Bytes)>,
  },
  /// A dynamic resource's handler ran; forward whatever it produced
  Handled(Option<Addrd<platform::Message<P>>>),
  /// Tear down this path & everything below it, then report
  Delete(P::Bytes),
  /// `.well-known/core`
  Discover,
}

impl<P, T, R> Server<P, T, R>
  where P: PlatformTypes,
        T: Transport,
        R: Linker<P>
{
  /// Answer one decoded request.
  ///
  /// The request is consumed: by the time this returns, it has been
  /// answered (or deliberately silenced) and dropped.
  ///
  /// - Requests for `.well-known/core` get the discovery listing.
  /// - Requests hitting a dynamic resource are access-checked, then
  ///   delegated to the resource's [`Handler`](crate::resource::Handler).
  /// - Requests hitting a stored resource are access-checked and
  ///   served: GET reads, PUT/POST replace the representation,
  ///   DELETE removes the resource and everything below it.
  /// - PUT/POST to a path nobody registered implicitly create a
  ///   stored resource there ([`Access::DEFAULT`]) and answer
  ///   `2.01 CREATED`.
  /// - Everything else is `4.04 NOT FOUND`, `4.05 METHOD NOT
  ///   ALLOWED`, `4.03 FORBIDDEN` or `5.00 INTERNAL SERVER ERROR`,
  ///   per the tables in RFC 7252.
  ///
  /// RESET and ACK requests are never answered. Responses mirror the
  /// request's id & token, ACKing confirmable requests and NONing
  /// the rest.
  ///
  /// # Errors
  /// Failures *sending* a response surface here (see
  /// [`send`](Server::send)); failures *handling* the request become
  /// error responses instead. Either way the request is released.
  pub fn process(&mut self, req: Addrd<platform::Message<P>>) -> Result<(), ErrorOf<P, T, R>> {
    log::trace!("{} <- {}", logging::msg_summary::<P>(req.data()), req.addr());

    match self.route(&req) {
      | Routed::Discover => self.discover(req),
      | Routed::Handled(None) => Ok(()),
      | Routed::Handled(Some(resp)) => self.send(resp),
      | Routed::Delete(p) => {
        let p: &[u8] = &p;
        let status = match self.delete(p) {
          | Ok(()) => code::DELETED,
          | Err(_) => code::INTERNAL_SERVER_ERROR,
        };

        self.respond(req, Some(status), None)
      },
      | Routed::Respond { status, content } => self.respond(req, status, content),
    }
  }

  fn route(&mut self, req: &Addrd<platform::Message<P>>) -> Routed<P> {
    if req.data().code.kind() != CodeKind::Request {
      return Routed::Respond { status: None,
                               content: None };
    }

    let path = match path::joined::<P>(req.data()) {
      | Some(path) => path,
      | None => {
        return Routed::Respond { status: Some(code::INTERNAL_SERVER_ERROR),
                                 content: None }
      },
    };

    if &path[..] == discover::WELLKNOWN_CORE {
      return Routed::Discover;
    }

    let method = Method::try_from_code(req.data().code);

    match self.store.index_of(&path) {
      | Some(ix) => self.route_hit(ix, req, method, path),
      | None => self.route_miss(req, method, path),
    }
  }

  fn route_hit(&mut self,
               ix: usize,
               req: &Addrd<platform::Message<P>>,
               method: Option<Method>,
               path: P::Bytes)
               -> Routed<P> {
    let resource = match self.store.get_mut(ix) {
      | Some(resource) => resource,
      | None => unreachable!(),
    };

    match &mut resource.kind {
      | Kind::Dynamic { handler } => {
        let denied = method.map(|m| !resource.access.allows(m)).unwrap_or(false);

        if denied {
          Routed::Respond { status: Some(code::METHOD_NOT_ALLOWED),
                            content: None }
        } else {
          Routed::Handled(handler.as_mut().and_then(|h| h.handle(req.as_ref())))
        }
      },
      | Kind::Static { payload } => match method {
        | Some(m) if !resource.access.allows(m) => {
          Routed::Respond { status: Some(code::METHOD_NOT_ALLOWED),
                            content: None }
        },
        | Some(Method::GET) => {
          let format = resource.params.as_ref().and_then(|p| p.coap_content_type);
          Routed::Respond { status: Some(code::CONTENT),
                            content: Some((format, payload.clone())) }
        },
        | Some(Method::POST) | Some(Method::PUT) => {
          *payload = req.data().payload.0.clone();

          if let Some(format) = req.data().content_format() {
            if let Some(params) = resource.params.as_mut() {
              params.coap_content_type = Some(format);
            }
          }

          Routed::Respond { status: Some(code::CHANGED),
                            content: None }
        },
        | Some(Method::DELETE) => Routed::Delete(path),
        | _ => Routed::Respond { status: Some(code::FORBIDDEN),
                                 content: None },
      },
    }
  }

  fn route_miss(&mut self,
                req: &Addrd<platform::Message<P>>,
                method: Option<Method>,
                path: P::Bytes)
                -> Routed<P> {
    match method {
      | Some(Method::POST) | Some(Method::PUT) => {
        log::debug!("implicitly creating {}",
                    core::str::from_utf8(&path).unwrap_or("<non-utf8 path>"));

        // the requested path is kept as-is here, not trimmed the way
        // explicitly created paths are
        let resource = Resource { path,
                                  access: Access::DEFAULT,
                                  kind: Kind::Static { payload: req.data().payload.0.clone() },
                                  params: None };

        match self.store.insert(resource) {
          | Ok(()) => Routed::Respond { status: Some(code::CREATED),
                                        content: None },
          | Err(store::Exhausted) => {
            Routed::Respond { status: Some(code::INTERNAL_SERVER_ERROR),
                              content: None }
          },
        }
      },
      | _ => Routed::Respond { status: Some(code::NOT_FOUND),
                               content: None },
    }
  }

  fn respond(&self,
             req: Addrd<platform::Message<P>>,
             status: Option<Code>,
             content: Option<(Option<ContentFormat>, P::Bytes)>)
             -> Result<(), ErrorOf<P, T, R>> {
    match req.data().ty {
      | Type::Reset | Type::Ack => return Ok(()),
      | _ => (),
    }

    let code = status.unwrap_or(code::INTERNAL_SERVER_ERROR);
    let ty = match req.data().ty {
      | Type::Con => Type::Ack,
      | _ => Type::Non,
    };

    let mut msg: platform::Message<P> = Message { ty,
                                                  id: req.data().id,
                                                  token: req.data().token,
                                                  ver: Default::default(),
                                                  code,
                                                  opts: Default::default(),
                                                  payload: Payload(Default::default()) };

    if code == code::CONTENT {
      if let Some((format, payload)) = content {
        if let Some(format) = format {
          msg.set_content_format(format).map_err(Error::SetOption)?;
        }

        msg.payload = Payload(payload);
      }
    }

    self.send(Addrd(msg, req.addr()))
  }
}

#[cfg(test)]
mod tests {
  use toad_msg::{Id, MessageOptions, Type};

  use super::*;
  use crate::code;
  use crate::test::{self, TestHandler};

  type Resource = crate::resource::Resource<test::Platform>;

  #[test]
  fn get_serves_the_stored_representation() {
    let mut server = test::server();
    server.create(&mut Resource::stored("sensors/temp", Access::GET, "21.5"))
          .unwrap();

    let req = test::req(Method::GET.code(), "sensors/temp");
    server.process(req.clone()).unwrap();

    let resp = test::sent(server.transport()).pop().unwrap();
    assert_eq!(resp.data().code, code::CONTENT);
    assert_eq!(resp.data().ty, Type::Ack);
    assert_eq!(resp.data().id, req.data().id);
    assert_eq!(resp.data().token, req.data().token);
    assert_eq!(&resp.data().payload.0, b"21.5");
    assert_eq!(resp.addr(), req.addr());
  }

  #[test]
  fn get_responses_carry_the_resources_content_format() {
    use toad_msg::ContentFormat;

    let mut server = test::server();
    let params = crate::resource::Params { coap_content_type: Some(ContentFormat::Json),
                                           ..Default::default() };
    server.create(&mut Resource::stored("cfg", Access::GET, "{}").with_params(params))
          .unwrap();

    server.process(test::req(Method::GET.code(), "cfg")).unwrap();

    let resp = test::sent(server.transport()).pop().unwrap();
    assert_eq!(resp.data().content_format(), Some(ContentFormat::Json));
  }

  #[test]
  fn two_gets_yield_identical_responses() {
    let mut server = test::server();
    server.create(&mut Resource::stored("a", Access::GET, "x")).unwrap();

    server.process(test::req(Method::GET.code(), "a")).unwrap();
    server.process(test::req(Method::GET.code(), "a")).unwrap();

    let sent = server.transport().sent.borrow();
    assert_eq!(sent[0], sent[1]);
  }

  #[test]
  fn denied_methods_are_refused_and_change_nothing() {
    let mut server = test::server();
    server.create(&mut Resource::stored("sensors/temp", Access::GET, "21.5"))
          .unwrap();

    server.process(test::req(Method::DELETE.code(), "sensors/temp"))
          .unwrap();

    let resp = test::sent(server.transport()).pop().unwrap();
    assert_eq!(resp.data().code, code::METHOD_NOT_ALLOWED);
    assert_eq!(server.list().unwrap().len(), 1);
  }

  #[test]
  fn put_replaces_the_representation_and_remembers_its_format() {
    use toad_msg::ContentFormat;

    let mut server = test::server();
    server.create(&mut Resource::stored("a", Access::GET | Access::PUT, "old")
                         .with_params(Default::default()))
          .unwrap();

    let mut req = test::req(Method::PUT.code(), "a");
    req.data_mut().payload = toad_msg::Payload(b"new".to_vec());
    req.data_mut().set_content_format(ContentFormat::Text).unwrap();
    server.process(req).unwrap();

    let resp = test::sent(server.transport()).pop().unwrap();
    assert_eq!(resp.data().code, code::CHANGED);

    let stored = server.resources().next().unwrap();
    assert_eq!(stored.payload(), Some("new".as_bytes()));
    assert_eq!(stored.params.as_ref().unwrap().coap_content_type,
               Some(ContentFormat::Text));
  }

  #[test]
  fn delete_answers_deleted_and_cascades() {
    let mut server = test::server();
    for path in ["a/b", "a/b/1", "a/b/2", "a/c"] {
      server.create(&mut Resource::stored(path, Access::ALL, "")).unwrap();
    }

    server.process(test::req(Method::DELETE.code(), "a/b")).unwrap();

    let resp = test::sent(server.transport()).pop().unwrap();
    assert_eq!(resp.data().code, code::DELETED);
    assert_eq!(server.list().unwrap(), vec![b"a/c".to_vec()]);
  }

  #[test]
  fn put_to_an_unknown_path_creates_the_resource() {
    let mut server = test::server();

    let mut put = test::req(Method::PUT.code(), "new/thing");
    put.data_mut().payload = toad_msg::Payload(b"hi".to_vec());
    server.process(put).unwrap();

    let created = test::sent(server.transport()).pop().unwrap();
    assert_eq!(created.data().code, code::CREATED);

    server.process(test::req(Method::GET.code(), "new/thing")).unwrap();
    let got = test::sent(server.transport()).pop().unwrap();
    assert_eq!(got.data().code, code::CONTENT);
    assert_eq!(&got.data().payload.0, b"hi");
  }

  #[test]
  fn get_of_an_unknown_path_is_not_found() {
    let mut server = test::server();
    server.process(test::req(Method::GET.code(), "nope")).unwrap();

    let resp = test::sent(server.transport()).pop().unwrap();
    assert_eq!(resp.data().code, code::NOT_FOUND);
  }

  #[test]
  fn reset_requests_are_silenced() {
    let mut server = test::server();

    let mut req = test::req(Method::GET.code(), "nope");
    req.data_mut().ty = Type::Reset;
    server.process(req).unwrap();

    assert!(test::sent(server.transport()).is_empty());
  }

  #[test]
  fn non_requests_are_answered_with_nons() {
    let mut server = test::server();
    server.create(&mut Resource::stored("a", Access::GET, "x")).unwrap();

    let mut req = test::req(Method::GET.code(), "a");
    req.data_mut().ty = Type::Non;
    server.process(req).unwrap();

    let resp = test::sent(server.transport()).pop().unwrap();
    assert_eq!(resp.data().ty, Type::Non);
  }

  #[test]
  fn unroutable_codes_get_internal_server_error() {
    let mut server = test::server();

    let mut req = test::req(toad_msg::Code::new(2, 05), "a");
    req.data_mut().id = Id(33);
    server.process(req).unwrap();

    let resp = test::sent(server.transport()).pop().unwrap();
    assert_eq!(resp.data().code, code::INTERNAL_SERVER_ERROR);
    assert_eq!(resp.data().id, Id(33));
  }

  #[test]
  fn unrouted_request_methods_are_forbidden() {
    let mut server = test::server();
    server.create(&mut Resource::stored("a", Access::ALL, "x")).unwrap();

    // FETCH-shaped: in the request range, but not a method we route
    server.process(test::req(toad_msg::Code::new(0, 05), "a")).unwrap();

    let resp = test::sent(server.transport()).pop().unwrap();
    assert_eq!(resp.data().code, code::FORBIDDEN);
  }

  #[test]
  fn dynamic_resources_delegate_to_their_handler() {
    let mut server = test::server();

    let mut desc =
      Resource::dynamic("echo", Access::ALL, TestHandler(|req| {
                          let mut resp = test::req_no_path(code::CONTENT);
                          resp.data_mut().id = req.data().id;
                          resp.data_mut().ty = Type::Ack;
                          resp.data_mut().payload = req.data().payload.clone();
                          Some(Addrd(resp.unwrap(), req.addr()))
                        }));
    server.create(&mut desc).unwrap();

    let mut req = test::req(Method::POST.code(), "echo");
    req.data_mut().payload = toad_msg::Payload(b"marco".to_vec());
    server.process(req).unwrap();

    let resp = test::sent(server.transport()).pop().unwrap();
    assert_eq!(resp.data().code, code::CONTENT);
    assert_eq!(&resp.data().payload.0, b"marco");
  }

  #[test]
  fn dynamic_resources_still_enforce_access() {
    let mut server = test::server();

    let mut desc = Resource::dynamic("locked", Access::NONE, TestHandler(|_| {
                                       panic!("handler must not run")
                                     }));
    server.create(&mut desc).unwrap();

    server.process(test::req(Method::GET.code(), "locked")).unwrap();

    let resp = test::sent(server.transport()).pop().unwrap();
    assert_eq!(resp.data().code, code::METHOD_NOT_ALLOWED);
  }

  #[test]
  fn dynamic_resources_without_a_handler_swallow_the_request() {
    let mut server = test::server();

    let mut desc = Resource { path: b"quiet".to_vec(),
                              access: Access::ALL,
                              kind: Kind::Dynamic { handler: None },
                              params: None };
    server.create(&mut desc).unwrap();

    server.process(test::req(Method::GET.code(), "quiet")).unwrap();

    assert!(test::sent(server.transport()).is_empty());
  }
}
