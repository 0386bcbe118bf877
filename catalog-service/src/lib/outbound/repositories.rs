pub mod movie;
pub mod user;

pub use movie::MongoMovieRepository;
pub use user::MongoUserRepository;
