use core::fmt::Debug;
use core::ops::BitOr;

use toad_msg::ContentFormat;

use crate::method::Method;
use crate::net::Addrd;
use crate::path;
use crate::platform::{self, PlatformTypes};

/// Which methods a resource answers.
///
/// A bit set over the four request methods. A request whose method
/// is absent from the mask is refused with `4.05 METHOD NOT ALLOWED`.
///
/// ```
/// use toad_resource::method::Method;
/// use toad_resource::resource::Access;
///
/// let read_write = Access::GET | Access::PUT;
///
/// assert!(read_write.allows(Method::GET));
/// assert!(!read_write.allows(Method::DELETE));
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Access(u8);

impl Access {
  /// Answer nothing
  pub const NONE: Access = Access(0);

  /// Answer GET requests
  pub const GET: Access = Access(1);

  /// Answer POST requests
  pub const POST: Access = Access(2);

  /// Answer PUT requests
  pub const PUT: Access = Access(4);

  /// Answer DELETE requests
  pub const DELETE: Access = Access(8);

  /// Answer all four methods
  pub const ALL: Access = Access(1 | 2 | 4 | 8);

  /// Access granted to resources created implicitly by a PUT or POST
  /// to a path nobody registered
  pub const DEFAULT: Access = Access(1 | 4 | 8);

  /// Whether requests with this method should be answered
  pub fn allows(&self, method: Method) -> bool {
    let bit = match method {
      | Method::GET => Self::GET,
      | Method::POST => Self::POST,
      | Method::PUT => Self::PUT,
      | Method::DELETE => Self::DELETE,
      | _ => Self::NONE,
    };

    self.0 & bit.0 == bit.0 && bit != Self::NONE
  }
}

impl BitOr for Access {
  type Output = Access;

  fn bitor(self, rhs: Access) -> Access {
    Access(self.0 | rhs.0)
  }
}

/// Whether external registration logic (e.g. a Resource Directory
/// client) has advertised this resource yet.
///
/// The server only ever resets this to [`NotRegistered`](Registration::NotRegistered)
/// when a resource is created; flipping it forward is the
/// registration layer's business.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Registration {
  /// Not advertised anywhere
  #[default]
  NotRegistered,
  /// Advertised
  Registered,
}

/// Descriptive metadata attached to a resource.
///
/// Everything here is advertisement & bookkeeping: the dispatcher
/// only reads [`coap_content_type`](Params::coap_content_type) (to
/// stamp GET responses) and writes it (when a PUT/POST carries a
/// Content-Format); the rest feeds link-format rendering and
/// registration.
pub struct Params<P: PlatformTypes> {
  /// Resource type (the `rt` link attribute)
  pub resource_type: Option<P::Bytes>,
  /// Interface description (the `if` link attribute)
  pub interface_description: Option<P::Bytes>,
  /// MIME type known to the host application
  pub mime_content_type: u16,
  /// CoAP Content-Format of the stored representation
  pub coap_content_type: Option<ContentFormat>,
  /// Whether observers may subscribe to this resource
  pub observable: bool,
  /// See [`Registration`]
  pub registration: Registration,
}

impl<P: PlatformTypes> Default for Params<P> {
  fn default() -> Self {
    Self { resource_type: None,
           interface_description: None,
           mime_content_type: 0,
           coap_content_type: None,
           observable: false,
           registration: Registration::NotRegistered }
  }
}

impl<P: PlatformTypes> Clone for Params<P> {
  fn clone(&self) -> Self {
    Self { resource_type: self.resource_type.clone(),
           interface_description: self.interface_description.clone(),
           mime_content_type: self.mime_content_type,
           coap_content_type: self.coap_content_type,
           observable: self.observable,
           registration: self.registration }
  }
}

impl<P: PlatformTypes> Debug for Params<P> {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("Params")
     .field("resource_type", &self.resource_type)
     .field("interface_description", &self.interface_description)
     .field("mime_content_type", &self.mime_content_type)
     .field("coap_content_type", &self.coap_content_type)
     .field("observable", &self.observable)
     .field("registration", &self.registration)
     .finish()
  }
}

/// Answers requests aimed at a [dynamic](Kind::Dynamic) resource.
///
/// The handler is given the request and where it came from, and
/// whatever it yields is serialized and sent by the server on its
/// behalf. Yielding `None` means "no response", e.g. when the handler
/// queued work and will answer later through
/// [`Server::send`](crate::server::Server::send).
///
/// Implemented for any `FnMut` with the same shape.
pub trait Handler<P: PlatformTypes> {
  /// Answer (or swallow) a request
  fn handle(&mut self,
            req: Addrd<&platform::Message<P>>)
            -> Option<Addrd<platform::Message<P>>>;
}

impl<P, F> Handler<P> for F
  where P: PlatformTypes,
        F: FnMut(Addrd<&platform::Message<P>>) -> Option<Addrd<platform::Message<P>>>
{
  fn handle(&mut self,
            req: Addrd<&platform::Message<P>>)
            -> Option<Addrd<platform::Message<P>>> {
    self(req)
  }
}

/// [`Handler`] that swallows every request
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Ignore;

impl<P: PlatformTypes> Handler<P> for Ignore {
  fn handle(&mut self,
            _: Addrd<&platform::Message<P>>)
            -> Option<Addrd<platform::Message<P>>> {
    None
  }
}

/// How a resource produces its representation
pub enum Kind<P: PlatformTypes> {
  /// The representation is `payload`, owned by the store and
  /// replaced wholesale by PUT/POST requests
  Static {
    /// The stored representation
    payload: P::Bytes,
  },
  /// Requests are delegated to a host [`Handler`].
  ///
  /// `None` means "accept & drop": access control still applies, but
  /// matching requests are consumed without an answer.
  Dynamic {
    /// See [`Handler`]
    handler: Option<P::Handler>,
  },
}

impl<P: PlatformTypes> Default for Kind<P> {
  fn default() -> Self {
    Self::Static { payload: Default::default() }
  }
}

impl<P: PlatformTypes> Clone for Kind<P> {
  fn clone(&self) -> Self {
    match self {
      | Self::Static { payload } => Self::Static { payload: payload.clone() },
      | Self::Dynamic { handler } => Self::Dynamic { handler: handler.clone() },
    }
  }
}

impl<P: PlatformTypes> Debug for Kind<P> {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    match self {
      | Self::Static { payload } => f.debug_struct("Static").field("payload", payload).finish(),
      | Self::Dynamic { handler } => f.debug_struct("Dynamic").field("handler", handler).finish(),
    }
  }
}

/// A thing with a path that answers requests.
///
/// Hosts build these as descriptors and hand them to
/// [`Server::create`](crate::server::Server::create) /
/// [`update`](crate::server::Server::update); the store keeps its
/// own deep copy, so the descriptor stays owned by (and disposable
/// by) the caller.
pub struct Resource<P: PlatformTypes> {
  /// Where this resource lives. Stored trimmed of surrounding `/`s.
  pub path: P::Bytes,
  /// See [`Access`]
  pub access: Access,
  /// See [`Kind`]
  pub kind: Kind<P>,
  /// See [`Params`]
  pub params: Option<Params<P>>,
}

impl<P: PlatformTypes> Resource<P> {
  /// A resource served from stored bytes
  ///
  /// ```
  /// use toad_resource::platform::Alloc;
  /// use toad_resource::resource::{Access, Resource};
  ///
  /// let r: Resource<Alloc> = Resource::stored("sensors/temp", Access::GET, "21.5");
  /// assert_eq!(r.payload(), Some("21.5".as_bytes()));
  /// ```
  pub fn stored<A, B>(path: A, access: Access, payload: B) -> Self
    where A: AsRef<[u8]>,
          B: AsRef<[u8]>
  {
    Self { path: path.as_ref().iter().copied().collect(),
           access,
           kind: Kind::Static { payload: payload.as_ref().iter().copied().collect() },
           params: None }
  }

  /// A resource served by a host callback
  pub fn dynamic<A>(path: A, access: Access, handler: P::Handler) -> Self
    where A: AsRef<[u8]>
  {
    Self { path: path.as_ref().iter().copied().collect(),
           access,
           kind: Kind::Dynamic { handler: Some(handler) },
           params: None }
  }

  /// Attach [`Params`] to this resource
  pub fn with_params(mut self, params: Params<P>) -> Self {
    self.params = Some(params);
    self
  }

  /// The stored representation, if there is one.
  ///
  /// Always `None` for dynamic resources.
  pub fn payload(&self) -> Option<&[u8]> {
    match self.kind {
      | Kind::Static { ref payload } => Some(payload),
      | Kind::Dynamic { .. } => None,
    }
  }

  /// Deep-copy this descriptor into the shape the store keeps:
  /// same everything, path trimmed of surrounding `/`s.
  pub(crate) fn to_stored(&self) -> Self {
    Self { path: path::trim(&self.path).iter().copied().collect(),
           access: self.access,
           kind: self.kind.clone(),
           params: self.params.clone() }
  }
}

impl<P: PlatformTypes> Default for Resource<P> {
  fn default() -> Self {
    Self { path: Default::default(),
           access: Access::NONE,
           kind: Default::default(),
           params: None }
  }
}

impl<P: PlatformTypes> Clone for Resource<P> {
  fn clone(&self) -> Self {
    Self { path: self.path.clone(),
           access: self.access,
           kind: self.kind.clone(),
           params: self.params.clone() }
  }
}

impl<P: PlatformTypes> Debug for Resource<P> {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("Resource")
     .field("path", &self.path)
     .field("access", &self.access)
     .field("kind", &self.kind)
     .field("params", &self.params)
     .finish()
  }
}
