//! [RFC 6690](https://datatracker.ietf.org/doc/html/rfc6690)
//! "CoRE Link Format": the payload behind `.well-known/core`.

use core::fmt::Write;

use toad_array::{AppendCopy, Array};
use toad_len::Len;
use toad_writable::Writable;

use crate::platform::PlatformTypes;
use crate::resource::Resource;

/// Renders the discovery payload.
///
/// When a request for `.well-known/core` comes in, the server asks
/// its `Linker` for the bytes to answer with, handing it the current
/// resources. [`CoreLinkFormat`] is the stock implementation;
/// deployments with a registration layer that already knows how to
/// describe their resources plug that in here instead.
pub trait Linker<P: PlatformTypes> {
  /// Why a listing could not be produced
  type Error: core::fmt::Debug;

  /// Produce the discovery payload advertising `resources`
  fn render<'a, I>(&mut self, resources: I) -> Result<P::Bytes, Self::Error>
    where I: Iterator<Item = &'a Resource<P>>,
          P: 'a;
}

/// The listing did not fit in the platform's byte buffer
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Overflow;

/// Stock [`Linker`]: plain RFC 6690 rendering of every resource in
/// the store.
///
/// Each resource becomes `</path>`, annotated with `rt` / `if` /
/// `ct` / `obs` attributes when its [`Params`](crate::resource::Params)
/// carry them:
///
/// ```text
/// </sensors/temp>;rt="temperature-c";if="sensor",</sensors/light>;obs
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct CoreLinkFormat;

fn push<A>(buf: &mut Writable<A>, bytes: &[u8]) -> Result<(), Overflow>
  where A: Array<Item = u8> + AppendCopy<u8>
{
  match A::CAPACITY {
    | Some(max) if max < buf.len() + bytes.len() => Err(Overflow),
    | _ => {
      buf.append_copy(bytes);
      Ok(())
    },
  }
}

impl<P: PlatformTypes> Linker<P> for CoreLinkFormat {
  type Error = Overflow;

  fn render<'a, I>(&mut self, resources: I) -> Result<P::Bytes, Self::Error>
    where I: Iterator<Item = &'a Resource<P>>,
          P: 'a
  {
    let mut buf = Writable::<P::Bytes>::default();
    let mut first = true;

    for resource in resources {
      if !first {
        push(&mut buf, b",")?;
      }

      push(&mut buf, b"</")?;
      push(&mut buf, &resource.path)?;
      push(&mut buf, b">")?;

      if let Some(params) = resource.params.as_ref() {
        if let Some(rt) = params.resource_type.as_ref() {
          push(&mut buf, b";rt=\"")?;
          push(&mut buf, rt)?;
          push(&mut buf, b"\"")?;
        }

        if let Some(ifd) = params.interface_description.as_ref() {
          push(&mut buf, b";if=\"")?;
          push(&mut buf, ifd)?;
          push(&mut buf, b"\"")?;
        }

        if let Some(ct) = params.coap_content_type {
          write!(buf, ";ct={}", u16::from(&ct)).map_err(|_| Overflow)?;
        }

        if params.observable {
          push(&mut buf, b";obs")?;
        }
      }

      first = false;
    }

    Ok(buf.unwrap())
  }
}

#[cfg(test)]
mod tests {
  use toad_msg::ContentFormat;

  use super::*;
  use crate::resource::{Access, Params};
  use crate::test;

  type Resource = crate::resource::Resource<test::Platform>;

  fn render(resources: &[Resource]) -> Vec<u8> {
    Linker::<test::Platform>::render(&mut CoreLinkFormat, resources.iter()).unwrap()
  }

  #[test]
  fn bare_resources_render_as_comma_separated_links() {
    let rendered = render(&[Resource::stored("a/b", Access::GET, ""),
                            Resource::stored("c", Access::GET, "")]);

    assert_eq!(rendered, b"</a/b>,</c>".to_vec());
  }

  #[test]
  fn params_become_link_attributes() {
    let params = Params { resource_type: Some(b"temperature-c".to_vec()),
                          interface_description: Some(b"sensor".to_vec()),
                          coap_content_type: Some(ContentFormat::Text),
                          observable: true,
                          ..Default::default() };

    let rendered =
      render(&[Resource::stored("sensors/temp", Access::GET, "21.5").with_params(params)]);

    assert_eq!(rendered,
               b"</sensors/temp>;rt=\"temperature-c\";if=\"sensor\";ct=0;obs".to_vec());
  }

  #[test]
  fn empty_store_renders_an_empty_listing() {
    assert_eq!(render(&[]), Vec::<u8>::new());
  }
}
