pub mod arguments;
pub mod binding;
pub mod member;
pub mod signature;
pub mod type_info;

pub use crate::domain::DomainError;
pub use arguments::Arguments;
pub use binding::{Binding, ResolutionKey, ResolutionTable};
pub use member::{CandidateMember, InterfaceMember};
pub use signature::MethodSignature;
pub use type_info::TypeInfo;
