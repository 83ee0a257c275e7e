pub use super::movies::Entity as Movies;
pub use super::reviews::Entity as Reviews;
pub use super::users::Entity as Users;
pub use super::watchlist::Entity as Watchlist;
