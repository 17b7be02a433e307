use toad_msg::Code;

/// Request method
///
/// A newtype over the request-range [`Code`]s, so that access
/// control and routing can speak in methods without losing the
/// underlying code.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Method(pub Code);

impl Method {
  #[doc = toad_macros::rfc_7252_doc!("5.8.1")]
  pub const GET: Method = Method(Code::GET);

  #[doc = toad_macros::rfc_7252_doc!("5.8.2")]
  pub const POST: Method = Method(Code::POST);

  #[doc = toad_macros::rfc_7252_doc!("5.8.3")]
  pub const PUT: Method = Method(Code::PUT);

  #[doc = toad_macros::rfc_7252_doc!("5.8.4")]
  pub const DELETE: Method = Method(Code::DELETE);

  /// Classify a message code as one of the four methods.
  ///
  /// Yields `None` for response codes, EMPTY, and request codes this
  /// server does not route (e.g. FETCH).
  ///
  /// ```
  /// use toad_msg::Code;
  /// use toad_resource::method::Method;
  ///
  /// assert_eq!(Method::try_from_code(Code::GET), Some(Method::GET));
  /// assert_eq!(Method::try_from_code(Code::new(2, 05)), None);
  /// ```
  pub fn try_from_code(code: Code) -> Option<Method> {
    [Self::GET, Self::POST, Self::PUT, Self::DELETE].into_iter()
                                                    .find(|m| m.0 == code)
  }

  /// Get the code for this method
  pub fn code(&self) -> Code {
    self.0
  }
}

impl core::fmt::Display for Method {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    match *self {
      | Self::GET => write!(f, "GET"),
      | Self::POST => write!(f, "POST"),
      | Self::PUT => write!(f, "PUT"),
      | Self::DELETE => write!(f, "DELETE"),
      | Self(c) => {
        let [a, b, c, d] = c.to_human();
        write!(f, "{}{}{}{}", a, b, c, d)
      },
    }
  }
}
