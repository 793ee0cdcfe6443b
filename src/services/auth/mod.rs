pub mod affordances;
pub mod authenticator;
pub mod authorization;
pub mod context;
pub mod factory;
pub mod principal;
pub mod principal_resolver;
pub mod token_codec;

#[cfg(test)]
pub(crate) mod test_support;

pub use authenticator::Authenticator;
pub use factory::build_authenticator;
pub use principal_resolver::PrincipalResolver;
pub use token_codec::TokenCodec;
