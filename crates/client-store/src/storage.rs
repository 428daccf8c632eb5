mod memory;
mod redis;

pub use memory::MemoryClientStore;
pub use self::redis::RedisClientStore;
