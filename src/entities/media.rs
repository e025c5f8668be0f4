use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "media")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub content_id: String,

    /// Public URL issued by the object store
    pub url: String,

    /// Object store key, used to remove the object with its content
    pub storage_path: String,

    /// image | video | other
    pub media_type: String,

    pub title: Option<String>,

    pub alt_text: Option<String>,

    pub width: Option<i32>,

    pub height: Option<i32>,

    /// Seconds
    pub duration: Option<f64>,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::content::Entity",
        from = "Column::ContentId",
        to = "super::content::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Content,
}

impl Related<super::content::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Content.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
