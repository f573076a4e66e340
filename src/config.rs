// config.rs — Default configuration constants.
//
// Every option struct in `crate::options` starts from these values. The CLI
// layers the `ZFLOW_CLEVEL` environment variable and explicit flags on top.

// Default compression level.
// Deliberately low: streaming callers flush often and favour latency.
pub const LEVEL_DEFAULT: i32 = 2;

// Accepted compression level range. -1 selects zlib's own default (6).
pub const LEVEL_MIN: i32 = -1;
pub const LEVEL_MAX: i32 = 9;

// Base-two logarithm of the history window.
pub const WINDOW_BITS_DEFAULT: u8 = 15;
pub const WINDOW_BITS_MIN: u8 = 9;
pub const WINDOW_BITS_MAX: u8 = 15;

// Raw inflate accepts one bit less than deflate will produce.
pub const INFLATE_WINDOW_BITS_MIN: u8 = 8;

// Memory used for the internal compression state: 1 = minimum, 9 = maximum.
pub const MEMORY_LEVEL_DEFAULT: u8 = 2;
pub const MEMORY_LEVEL_MIN: u8 = 1;
pub const MEMORY_LEVEL_MAX: u8 = 9;

// Size of the I/O buffers owned by the reader and writer adapters.
// One byte of every buffer is held back, so two bytes is the floor.
pub const BUFFER_SIZE_DEFAULT: usize = 1024;
pub const BUFFER_SIZE_MIN: usize = 2;

// Environment variable consulted by the CLI for its default level.
pub const ENV_CLEVEL: &str = "ZFLOW_CLEVEL";
