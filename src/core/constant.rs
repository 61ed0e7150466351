pub const CHAN_CAPACITY: usize = 100;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_GUEST: &str = "guest";

pub const PROMPT_NAME: &str = "Enter your name: ";
pub const PROMPT_PASSWORD: &str = "Enter your password: ";
pub const PROMPT_ROLE: &str = "Enter your role (admin or guest): ";

pub const ROLE_REJECTED: &str = "Such role doesn't exist";
pub const SIGNED_UP: &str = "User sign up successfully";
pub const SIGNED_IN: &str = "User sign in successfully";
pub const ROLE_MISSING: &str = "Error: role not found in database";

pub const USER_NOT_FOUND: &str = "User not found";
pub const USER_DELETED: &str = "User is deleted";
pub const USER_NOT_DELETED: &str = "User was not found";
pub const NOT_ENOUGH_RIGHTS: &str = "You don't have enough rights";
pub const USAGE_MSG: &str = "Usage: /msg <name> <message>";
pub const USAGE_KICK: &str = "Usage: /kick <name>";

pub const REGISTERED_HEADER: &str = "=== Registered users ===";
pub const ACTIVE_HEADER: &str = "=== Active participants ===";

/// Render layout of message timestamps, `2006-01-02 15:04:05` style
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
