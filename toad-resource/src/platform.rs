use core::fmt::Debug;

#[cfg(feature = "alloc")]
use std_alloc::vec::Vec;
use toad_array::{AppendCopy, Array};
use toad_msg::{OptValue, OptionMap};

#[cfg(feature = "alloc")]
use crate::resource::Ignore;
use crate::resource::{Handler, Resource};

/// Associates concrete collection types with a deployment target.
///
/// Everything the server owns (resource paths, stored
/// representations, path snapshots, the resource list itself) lives
/// in collections chosen here, so the same dispatcher runs against
/// `Vec`s on a hosted target and against `tinyvec::ArrayVec`s on a
/// heapless one.
///
/// On fixed-capacity platforms a full collection surfaces as
/// [`server::Error::CapacityExhausted`](crate::server::Error::CapacityExhausted)
/// (or a `5.00` response, when the server is mid-request and can
/// still answer); with `Vec`s those paths are unreachable.
pub trait PlatformTypes: Sized + 'static + Debug {
  /// Byte buffer used for message payloads, resource paths and
  /// stored representations
  type Bytes: Array<Item = u8> + Clone + Debug + PartialEq + AppendCopy<u8>;

  /// What type should we use to store option values?
  type MessageOptionBytes: Array<Item = u8> + 'static + Clone + Debug + PartialEq + AppendCopy<u8>;

  /// `OptionMap::OptValues`
  type MessageOptionValues: Array<Item = OptValue<Self::MessageOptionBytes>>
    + Clone
    + PartialEq
    + Debug;

  /// What type should we use to store the options?
  type MessageOptions: OptionMap<OptValues = Self::MessageOptionValues, OptValue = Self::MessageOptionBytes>
    + Clone
    + Debug
    + PartialEq;

  /// The collection backing the resource store
  type Resources: Array<Item = Resource<Self>> + Debug;

  /// The collection [`list`](crate::server::Server::list) snapshots
  /// paths into
  type Snapshot: Array<Item = Self::Bytes> + Debug;

  /// The host callback type answering requests for dynamic resources
  type Handler: Handler<Self> + Clone + Debug;
}

/// [`toad_msg::Message`] shaped by a [`PlatformTypes`]
pub type Message<P> =
  toad_msg::Message<<P as PlatformTypes>::Bytes, <P as PlatformTypes>::MessageOptions>;

/// Configures the server to use `Vec` for all collections.
///
/// The type argument is the dynamic-resource [`Handler`]; it defaults
/// to [`Ignore`] for servers that only host stored representations.
#[cfg(feature = "alloc")]
#[cfg_attr(docsrs, doc(cfg(feature = "alloc")))]
#[derive(Copy)]
pub struct Alloc<H = Ignore>(core::marker::PhantomData<H>);

#[cfg(feature = "alloc")]
impl<H> Debug for Alloc<H> {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    write!(f, "Alloc::<_>")
  }
}

#[cfg(feature = "alloc")]
impl<H> Clone for Alloc<H> {
  fn clone(&self) -> Self {
    Self(Default::default())
  }
}

#[cfg(feature = "alloc")]
impl<H> PlatformTypes for Alloc<H> where H: Handler<Self> + Clone + Debug + 'static
{
  type Bytes = Vec<u8>;
  type MessageOptionBytes = Vec<u8>;
  type MessageOptionValues = Vec<OptValue<Vec<u8>>>;
  type MessageOptions = std_alloc::collections::BTreeMap<toad_msg::OptNumber, Vec<OptValue<Vec<u8>>>>;
  type Resources = Vec<Resource<Self>>;
  type Snapshot = Vec<Vec<u8>>;
  type Handler = H;
}
