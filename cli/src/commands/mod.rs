mod favlist;
mod helpers;
mod menu;
mod record;
mod recover;
mod user;

pub(crate) use favlist::cmd_favlist_list;
pub(crate) use menu::{cmd_menu_add, cmd_menu_delete, cmd_menu_list};
pub(crate) use record::cmd_record_list;
pub(crate) use recover::cmd_recover;
pub(crate) use user::{cmd_user_register, cmd_user_show};
