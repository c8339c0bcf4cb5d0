pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: i64 = 8000;
pub const DEFAULT_CLIENT_URL: &str = "http://localhost:5173";
pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DEFAULT_RUST_LOG: &str = "info,tower_http=info";

pub const DEFAULT_DB_HOST: &str = "localhost";
pub const DEFAULT_DB_PORT: i64 = 5432;
pub const DEFAULT_DB_NAME: &str = "reptrack";
pub const DEFAULT_DB_USER: &str = "postgres";
pub const DEFAULT_DB_PASSWORD: &str = "postgres";
pub const DEFAULT_DB_MAX_CONNECTIONS: i64 = 10;
pub const DEFAULT_DB_MIN_IDLE: i64 = 2;

pub const DEFAULT_JWT_SECRET: &str = "super-secret-change-me";
pub const DEFAULT_JWT_ALGORITHM: &str = "HS256";
pub const DEFAULT_ACCESS_TOKEN_EXPIRE_MINUTES: i64 = 30;
pub const DEFAULT_REFRESH_TOKEN_EXPIRE_DAYS: i64 = 7;

pub const DEFAULT_SMTP_PORT: i64 = 587;
pub const LOCALHOST_ORIGIN: &str = "http://localhost";
