pub mod claims;
pub mod guards;
pub mod jwt;
pub mod middleware;
pub mod password;

pub use claims::Claims;
pub use guards::require_admin;
pub use jwt::JwtService;
pub use middleware::{AdminUser, AuthMiddleware, AuthenticatedUser};
