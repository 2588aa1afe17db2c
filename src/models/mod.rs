pub mod fakturering;
pub mod invoice_text;
pub mod issue;
pub mod log;
pub mod session;
pub mod stats;
pub mod status;
pub mod sync;
