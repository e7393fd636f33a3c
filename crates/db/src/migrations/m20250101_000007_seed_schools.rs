//! Seed the default school catalog when the table is empty.

use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::ConnectionTrait;

use super::m20250101_000005_create_catalog_tables::School;

/// (name, description, schedule)
const DEFAULT_SCHOOLS: [(&str, &str, &str); 8] = [
    ("Escola de Líderes", "Formação para novos líderes de célula.", "Terça 20h"),
    ("Maturidade no Espírito", "Curso de crescimento espiritual e fundamentos.", "Domingo 09h"),
    ("Seminário de Batalha Espiritual", "Aprenda a guerrear no espírito.", "Sábado 14h"),
    ("Curso de Casais", "Fortalecendo o matrimônio à luz da palavra.", "Quinta 20h"),
    ("Mestres de Vida", "Para homens que desejam ser sacerdotes do lar.", "Segunda 20h"),
    ("Mulheres que Vencem", "Curso exclusivo para o público feminino.", "Quarta 19h30"),
    ("Discipulado Pessoal", "Acompanhamento um a um.", "A combinar"),
    ("Liderança Avançada", "Para supervisores e pastores.", "Sexta 20h"),
];

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        let backend = manager.get_database_backend();

        let count = Query::select()
            .expr(Func::count(Expr::col(School::Id)))
            .from(School::Table)
            .to_owned();
        let existing: i64 = match db.query_one(backend.build(&count)).await? {
            Some(row) => row.try_get_by_index(0)?,
            None => 0,
        };
        if existing > 0 {
            return Ok(());
        }

        let mut insert = Query::insert();
        insert
            .into_table(School::Table)
            .columns([School::Name, School::Description, School::Schedule]);
        for (name, description, schedule) in DEFAULT_SCHOOLS {
            insert
                .values([name.into(), description.into(), schedule.into()])
                .map_err(|e| DbErr::Custom(e.to_string()))?;
        }
        db.execute(backend.build(&insert)).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let names: Vec<&str> = DEFAULT_SCHOOLS.iter().map(|(name, _, _)| *name).collect();
        let delete = Query::delete()
            .from_table(School::Table)
            .and_where(Expr::col(School::Name).is_in(names))
            .to_owned();
        manager.exec_stmt(delete).await
    }
}
