//! Request/response calls to the controller.
//!
//! [`RpcGateway`] maps every controller endpoint to a typed method on top
//! of an [`HttpTransport`]. Non-success responses are decoded into
//! [`PilitesError::Request`](crate::PilitesError::Request) with the message
//! produced by [`decode_error_message`].

mod detail;
mod gateway;
mod transport;

pub use detail::decode_error_message;
pub use gateway::{API_BASE, RpcGateway};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, Method, ReqwestTransport};
