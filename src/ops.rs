pub const ACCOUNTS: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/graphql/GetAccounts.graphql"
));
pub const CATEGORIES: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/graphql/GetTransactionCategories.graphql"
));
pub const TRANSACTIONS: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/graphql/GetTransactionsList.graphql"
));
pub const GET_TRANSACTION: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/graphql/GetTransactionDetails.graphql"
));
pub const UPDATE_TRANSACTION: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/graphql/UpdateTransaction.graphql"
));
pub const CREATE_TRANSACTION: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/graphql/CreateTransaction.graphql"
));
pub const SPLIT_TRANSACTION: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/graphql/SplitTransaction.graphql"
));
pub const BULK_UPDATE_TRANSACTIONS: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/graphql/BulkUpdateTransactions.graphql"
));
