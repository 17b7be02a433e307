//! `toad-resource` hosts CoAP resources.
//!
//! It pairs a flat store of addressable resources with a request
//! dispatcher: decoded requests ([`toad_msg::Message`]s) go in, the
//! dispatcher finds the resource the request addresses, applies the
//! resource's access policy, and answers through a [`Transport`](net::Transport)
//! of your choosing.
//!
//! ## Resources
//! A [`Resource`](resource::Resource) is a path plus a representation.
//! The representation is either a byte buffer owned by the store
//! ([stored](resource::Kind::Static)) or a host callback that builds
//! responses on demand ([dynamic](resource::Kind::Dynamic)).
//!
//! `PUT` and `POST` requests addressing paths nobody registered
//! create stored resources implicitly, so a bare server is usable as
//! a scratch key-value surface out of the box.
//!
//! ## Discovery
//! Requests for `.well-known/core` are answered with an
//! [RFC 6690](https://datatracker.ietf.org/doc/html/rfc6690)
//! link-format listing of everything in the store, rendered by the
//! [`Linker`](link_format::Linker) the server was created with.
//!
//! ## Scope
//! This crate is just the resource layer. Parsing datagrams into
//! [`toad_msg::Message`]s, deduplication, retransmission and blockwise
//! reassembly belong to the layers around it; the dispatcher expects
//! fully reassembled requests and answers each one at most once.
//!
//! ```
//! use toad_resource::platform::Alloc;
//! use toad_resource::resource::{Access, Resource};
//! use toad_resource::server::Server;
//!
//! let sock = std::net::UdpSocket::bind("127.0.0.1:0").unwrap();
//! let mut server: Server<Alloc, _> = Server::new(sock, Default::default());
//!
//! let mut temp = Resource::stored("sensors/temp", Access::GET, "21.5");
//! server.create(&mut temp).unwrap();
//!
//! assert_eq!(server.list().unwrap().len(), 1);
//! ```

// docs
#![doc(html_root_url = "https://docs.rs/toad-resource/0.1.0")]
#![cfg_attr(any(docsrs, feature = "docs"), feature(doc_cfg))]
// -
// style
#![allow(clippy::unused_unit)]
// -
// deny
#![deny(missing_docs)]
#![deny(missing_debug_implementations)]
#![deny(missing_copy_implementations)]
#![cfg_attr(not(test), deny(unsafe_code))]
// -
// warnings
#![cfg_attr(not(test), warn(unreachable_pub))]
// -
// features
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "alloc")]
extern crate alloc as std_alloc;

macro_rules! code {
  (rfc7252($section:literal) $name:ident = $c:literal . $d:literal) => {
    #[doc = toad_macros::rfc_7252_doc!($section)]
    #[allow(clippy::zero_prefixed_literal)]
    pub const $name: toad_msg::Code = toad_msg::Code::new($c, $d);
  };
}

#[cfg(test)]
pub(crate) mod test;

pub(crate) mod logging;

/// response codes
pub mod code;

/// link-format rendering for discovery
pub mod link_format;

/// request methods
pub mod method;

/// network abstractions
pub mod net;

/// uri path handling
pub mod path;

/// platform configuration
pub mod platform;

/// resources & their metadata
pub mod resource;

/// the resource store
pub mod store;

/// the resource server
pub mod server;

/// `std`-only toad-resource stuff
#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
pub mod std;
