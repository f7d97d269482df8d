//! Default value functions for configuration.

pub fn default_services_nick() -> String {
    "NickServ".to_string()
}

pub fn default_realname() -> String {
    "slirc-client".to_string()
}
