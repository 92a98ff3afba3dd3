mod interface_builder;
mod plist;

pub use interface_builder::InterfaceBuilderParser;
pub use plist::PlistParser;
