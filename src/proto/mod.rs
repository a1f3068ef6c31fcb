/// model listing wire types
pub mod model;
