use toad_array::{AppendCopy, Array};
use toad_len::Len;
use toad_msg::opt::known::repeat::PATH;
use toad_msg::MessageOptions;

use crate::platform::{self, PlatformTypes};

/// Strip a single leading and a single trailing `/` from a path.
///
/// Resources are stored under trimmed paths, and lookups trim the
/// path they are given, so `/sensors/temp`, `sensors/temp/` and
/// `sensors/temp` all address the same resource.
///
/// Only one byte is taken off each end; interior separators are
/// never touched.
///
/// ```
/// use toad_resource::path;
///
/// assert_eq!(path::trim(b"/sensors/temp/"), b"sensors/temp");
/// assert_eq!(path::trim(b"//a//"), b"/a/");
/// assert_eq!(path::trim(b"/"), b"");
/// assert_eq!(path::trim(b""), b"");
/// ```
pub fn trim(path: &[u8]) -> &[u8] {
  let path = match path {
    | [b'/', rest @ ..] => rest,
    | p => p,
  };

  match path {
    | [rest @ .., b'/'] => rest,
    | p => p,
  }
}

/// Whether `extra` more bytes fit in `buf` without growing past its
/// capacity (always true for collections without one)
pub(crate) fn fits<A: Len>(buf: &A, extra: usize) -> bool {
  A::CAPACITY.map(|cap| buf.len() + extra <= cap)
              .unwrap_or(true)
}

/// The requested path: every Uri-Path option value, joined with `/`.
///
/// `None` means the platform's byte buffer cannot hold the whole
/// path, in which case the request is unanswerable as-addressed.
pub(crate) fn joined<P>(msg: &platform::Message<P>) -> Option<P::Bytes>
  where P: PlatformTypes
{
  let mut out = P::Bytes::default();

  match msg.get(PATH) {
    | None => Some(out),
    | Some(segments) => {
      let mut first = true;

      for segment in segments.iter() {
        let bytes: &[u8] = &segment.0;

        if !fits(&out, bytes.len() + if first { 0 } else { 1 }) {
          return None;
        }

        if !first {
          out.push(b'/');
        }

        out.append_copy(bytes);
        first = false;
      }

      Some(out)
    },
  }
}
