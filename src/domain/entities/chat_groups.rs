use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::{chat_group_members, chat_groups};

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = chat_group_members)]
pub struct InsertChatGroupMemberEntity {
    pub group_id: Uuid,
    pub user_id: Uuid,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = chat_groups)]
pub struct InsertChatGroupEntity {
    pub mess_id: Uuid,
    pub name: String,
    pub is_default: bool,
}
