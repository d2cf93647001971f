pub mod connection;
pub mod emit;
pub mod introspect;
pub mod naming;
pub mod types;
pub mod url;

pub use connection::SqlxConnection;
pub use emit::{Confirm, GenerateError, GenerationReport, Generator, TableIdentity};
pub use introspect::{
    ColumnDescriptor, Connection, Dialect, IntrospectError, Introspector, IntrospectorBuilder, Row,
};
pub use types::{MapperError, TsType, map_type};
pub use url::{ConnectionUrl, mask_credentials};
