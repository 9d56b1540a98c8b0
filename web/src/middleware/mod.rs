pub mod correlation;
pub mod rate_limit;

pub use correlation::{correlation_id_layer, CorrelationIdExt, CORRELATION_ID_HEADER};
pub use rate_limit::{auth_rate_limit, rate_limit};
