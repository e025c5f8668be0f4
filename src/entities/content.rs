use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "content")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub title: String,

    pub description: Option<String>,

    /// video | image | article
    pub content_type: String,

    /// en | km
    pub language: String,

    /// draft | published | archived
    pub status: String,

    pub featured: bool,

    pub publish_date: Option<String>,

    pub user_id: String,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Users,

    #[sea_orm(has_many = "super::media::Entity")]
    Media,

    #[sea_orm(has_one = "super::content_analytics::Entity")]
    ContentAnalytics,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::media::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Media.def()
    }
}

impl Related<super::content_analytics::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ContentAnalytics.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
