//! Text commands understood by the bot

pub const ADD_ENTITY: &str = "!addentity";
pub const ADD_LOCAL_ENTITY: &str = "!addlocalentity";
pub const ADD_PREBUILT_ENTITY: &str = "!addprebuilt";
pub const EDIT_ENTITY: &str = "!editentity";
pub const DELETE_ENTITY: &str = "!deleteentity";
pub const ENTITIES: &str = "!entities";
pub const TEMPLATES: &str = "!templates";
pub const RENDER: &str = "!render";
pub const REMEMBER: &str = "!remember";
pub const FORGET: &str = "!forget";
pub const APP: &str = "!app";
pub const HELP: &str = "!help";

/// One line of usage per command
pub const USAGE: &[(&str, &str)] = &[
    (ADD_ENTITY, "{name} [~ negatable] [# bucket] [// task]  Add a LUIS entity"),
    (ADD_LOCAL_ENTITY, "{name} [~] [#] [// task]  Add a LOCAL entity"),
    (ADD_PREBUILT_ENTITY, "{PREBUILT} {name} [~] [#] [// task]  Add a LUIS prebuilt entity"),
    (EDIT_ENTITY, "{entity ID} {name} [~] [#] [// task]  Edit an entity"),
    (DELETE_ENTITY, "{entity ID}  Delete an entity and its negative"),
    (ENTITIES, "[search] [!]  List entities, ! for a compact listing"),
    (TEMPLATES, " List response templates"),
    (RENDER, "{template} [name=value ...]  Render a template"),
    (REMEMBER, "{entity}={value}  Remember an entity value"),
    (FORGET, "{entity}  Forget an entity value"),
    (APP, "{app ID}  Load an application"),
    (HELP, " Show this help"),
];

/// Full help text
pub fn help_text() -> String {
    let mut text = String::from("**Commands**\n\n");
    for (command, usage) in USAGE {
        text.push_str(&format!("{command} {usage}\n\n"));
    }
    text
}
