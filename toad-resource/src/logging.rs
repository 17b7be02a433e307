use core::fmt::Write;

use tinyvec::ArrayVec;
use toad_len::Len;
use toad_writable::Writable;

use crate::platform::{self, PlatformTypes};

pub(crate) fn msg_summary<P: PlatformTypes>(msg: &platform::Message<P>)
                                            -> Writable<ArrayVec<[u8; 64]>> {
  let mut buf: Writable<ArrayVec<[u8; 64]>> = Default::default();
  let code = msg.code.to_human();
  write!(buf,
         "{:?} {}{}{}{} with {} byte payload",
         msg.ty,
         code[0],
         code[1],
         code[2],
         code[3],
         msg.payload.0.len()).ok();
  buf
}
