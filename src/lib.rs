pub mod component;
pub mod config;
pub mod convert;
pub mod encoder;
pub mod error;
pub mod format;
pub mod from_json;
pub mod hasitem;
pub mod json;
pub mod nbt;
pub mod params;
pub mod range;
pub mod selector;
pub mod tellraw;

pub use component::{
    components_to_text, insert_text_with_component, parse_text_components, ComponentKind,
    TextComponent,
};
pub use config::{ConversionConfig, MnMode};
pub use convert::{convert, convert_selector, detect_dialect, filter_parameters, ConversionResult};
pub use encoder::{to_bedrock_rawtext_json, to_java_chat_json};
pub use error::ConvertError;
pub use params::Dialect;
pub use tellraw::{generate_tellraw, validate_tellraw_command, TellrawOutput};
