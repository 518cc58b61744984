use sea_query::Iden;

#[derive(Iden, Clone)]
pub enum Services {
    Table,
    Id,
    Title,
    Price,
    Doc,
}

#[derive(Iden, Clone)]
pub enum Checkout {
    Table,
    Id,
    Email,
    Doc,
}
