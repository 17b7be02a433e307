use toad_array::Array;
use toad_len::Len;
use toad_msg::to_bytes::MessageToBytesError;
use toad_msg::{OptValue, SetOptionError, TryIntoBytes};

use crate::link_format::{CoreLinkFormat, Linker};
use crate::logging;
use crate::net::{Addrd, Protocol, Transport};
use crate::platform::{self, PlatformTypes};
use crate::resource::{Kind, Registration, Resource};
use crate::store::{self, Store};

mod dispatch;
mod discover;

pub use discover::WELLKNOWN_CORE;

/// Errors encounterable by a [`Server`].
///
/// `S` is the transport's error, `L` the linker's. Each operation
/// documents the variants it can actually produce.
#[derive(Debug)]
pub enum Error<P, S, L>
  where P: PlatformTypes
{
  /// [`create`](Server::create) was handed a descriptor with an
  /// empty path
  PathEmpty,
  /// [`create`](Server::create) was handed a path that is already
  /// taken
  Exists,
  /// No resource lives at the path
  NotFound,
  /// A fixed-capacity collection could not hold the result
  CapacityExhausted,
  /// Serializing an outbound message failed
  MessageToBytes(MessageToBytesError),
  /// The transport was not ready to take the datagram
  Backpressure,
  /// The transport rejected the datagram
  Transport(S),
  /// The linker could not produce a discovery listing
  Link(L),
  /// An option could not be set on an outbound message
  SetOption(SetOptionError<OptValue<P::MessageOptionBytes>, P::MessageOptionValues>),
}

/// [`Error`] with `S` and `L` filled in from a [`Server`]'s
/// transport & linker
pub type ErrorOf<P, T, R> =
  Error<P, <T as Transport>::Error, <R as Linker<P>>::Error>;

/// A CoAP resource server.
///
/// Owns the resource [`Store`], a [`Transport`] to answer through,
/// and a [`Linker`] to render `.well-known/core` listings with.
///
/// The host drives it from two directions:
/// - the resource surface ([`create`](Server::create) /
///   [`update`](Server::update) / [`delete`](Server::delete) /
///   [`list`](Server::list) / [`resources`](Server::resources))
/// - the wire surface ([`process`](Server::process) for each decoded
///   request, [`send`](Server::send) for unsolicited messages)
///
/// There is no shared state beyond this value; create as many
/// independent servers as you have sockets to back them.
pub struct Server<P, T, R = CoreLinkFormat>
  where P: PlatformTypes,
        T: Transport,
        R: Linker<P>
{
  store: Store<P>,
  transport: T,
  linker: R,
}

impl<P, T, R> core::fmt::Debug for Server<P, T, R>
  where P: PlatformTypes,
        T: Transport,
        R: Linker<P>
{
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("Server").field("store", &self.store).finish()
  }
}

impl<P, T, R> Server<P, T, R>
  where P: PlatformTypes,
        T: Transport,
        R: Linker<P>
{
  /// Create a server answering through `transport`, with an empty
  /// store
  pub fn new(transport: T, linker: R) -> Self {
    Self { store: Store::new(),
           transport,
           linker }
  }

  /// Borrow the transport this server answers through
  pub fn transport(&self) -> &T {
    &self.transport
  }

  /// Add a resource to the store.
  ///
  /// The store keeps a deep copy with the path trimmed of
  /// surrounding `/`s; the descriptor remains the caller's. As a
  /// side effect the descriptor's params (when present) are marked
  /// [`Registration::NotRegistered`], since whatever registration
  /// logic sits above has plainly not seen this resource yet.
  ///
  /// # Errors
  /// - [`Error::PathEmpty`] when the descriptor's path is empty
  /// - [`Error::Exists`] when the (trimmed) path is already taken
  /// - [`Error::CapacityExhausted`] when the store is full
  pub fn create(&mut self, desc: &mut Resource<P>) -> Result<(), ErrorOf<P, T, R>> {
    if desc.path.is_empty() {
      return Err(Error::PathEmpty);
    }

    if self.store.find(&desc.path).is_some() {
      return Err(Error::Exists);
    }

    if let Some(params) = desc.params.as_mut() {
      params.registration = Registration::NotRegistered;
    }

    self.store
        .insert(desc.to_stored())
        .map_err(|store::Exhausted| Error::CapacityExhausted)
  }

  /// Replace the representation & access policy of the resource at
  /// the descriptor's path.
  ///
  /// "Representation" depends on the resource: a stored resource
  /// takes the descriptor's payload, a dynamic one takes its
  /// handler. A resource's kind is fixed at creation; a descriptor
  /// of the other kind updates nothing but access.
  ///
  /// Params are deliberately left alone: descriptive metadata
  /// belongs to whoever created the resource, and a representation
  /// update is not a re-description.
  ///
  /// # Errors
  /// - [`Error::NotFound`] when no resource lives at the path
  pub fn update(&mut self, desc: &Resource<P>) -> Result<(), ErrorOf<P, T, R>> {
    match self.store.find_mut(&desc.path) {
      | None => Err(Error::NotFound),
      | Some(resource) => {
        match (&mut resource.kind, &desc.kind) {
          | (Kind::Static { payload }, Kind::Static { payload: new }) => *payload = new.clone(),
          | (Kind::Dynamic { handler }, Kind::Dynamic { handler: new }) => {
            *handler = new.clone()
          },
          // kind is fixed at create time
          | _ => (),
        }

        resource.access = desc.access;
        Ok(())
      },
    }
  }

  /// Remove the resource at `path`, and every resource below it.
  ///
  /// "Below" means any path equal to `path` plus a `/` plus more;
  /// deleting `a/b` takes `a/b/1` and `a/b/2` with it but leaves
  /// `a/bc` alone.
  ///
  /// # Errors
  /// - [`Error::NotFound`] when no resource lives at exactly `path`
  ///   (sub-resources alone don't count)
  pub fn delete<A>(&mut self, path: A) -> Result<(), ErrorOf<P, T, R>>
    where A: AsRef<[u8]>
  {
    let path = path.as_ref();

    match self.store.remove(path) {
      | None => Err(Error::NotFound),
      | Some(_) => {
        let mut removed = 1;
        while self.store.remove_subresource(path).is_some() {
          removed += 1;
        }

        log::debug!("removed {} resource(s)", removed);
        Ok(())
      },
    }
  }

  /// Snapshot the paths of everything in the store.
  ///
  /// Every path is an independent copy; the snapshot stays valid
  /// (and stale) across later mutations.
  ///
  /// # Errors
  /// - [`Error::CapacityExhausted`] when the snapshot collection
  ///   cannot hold every path
  pub fn list(&self) -> Result<P::Snapshot, ErrorOf<P, T, R>> {
    let mut out = P::Snapshot::default();

    for resource in self.store.iter() {
      if out.is_full() {
        return Err(Error::CapacityExhausted);
      }

      out.push(resource.path.clone());
    }

    Ok(out)
  }

  /// Iterate the stored resources, most recently created first
  pub fn resources(&self) -> core::slice::Iter<'_, Resource<P>> {
    self.store.iter()
  }

  /// Serialize a message and hand it to the transport.
  ///
  /// This is how the server answers requests, and how hosts emit
  /// unsolicited messages (e.g. a dynamic resource responding late).
  ///
  /// # Errors
  /// - [`Error::MessageToBytes`] when serialization fails
  /// - [`Error::Backpressure`] when the transport was not ready
  /// - [`Error::Transport`] when the transport failed outright
  pub fn send(&self, msg: Addrd<platform::Message<P>>) -> Result<(), ErrorOf<P, T, R>> {
    let addr = msg.addr();
    log::trace!("sending {} -> {}", logging::msg_summary::<P>(msg.data()), addr);

    let bytes = msg.unwrap()
                   .try_into_bytes::<P::Bytes>()
                   .map_err(Error::MessageToBytes)?;
    let dgram: &[u8] = &bytes;

    self.transport
        .send(Protocol::Coap, Addrd(dgram, addr))
        .map_err(|e| match e {
          | nb::Error::WouldBlock => Error::Backpressure,
          | nb::Error::Other(e) => Error::Transport(e),
        })
  }
}
