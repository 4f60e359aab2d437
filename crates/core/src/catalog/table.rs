//! Endpoint rows for the Actual Budget REST API
//!
//! Paths are relative to `ApiConfig::api_prefix`.

use budgetlink_domain::HttpMethod::{Delete, Get, Post, Put};
use budgetlink_domain::Resource;

use super::FieldKind::{Boolean, Collection, FixedCollection, Json, Number, Options};
use super::Transform::{CommaList, JsonFilter, NonEmpty, QueryLimit, QueryTable, SelectFields};
use super::{Binding, EndpointDef, FieldKind};

const STRING: FieldKind = FieldKind::String;

const UPDATE_FIELDS: Binding = Binding::body("updateFields", "fields", Collection).transform(NonEmpty);

pub const ENDPOINTS: &[EndpointDef] = &[
    // Accounts
    EndpointDef {
        resource: Resource::Account,
        operation: "getAll",
        display_name: "Get Many",
        description: "Get all accounts",
        method: Get,
        path: "/accounts",
        bindings: &[],
    },
    EndpointDef {
        resource: Resource::Account,
        operation: "create",
        display_name: "Create",
        description: "Create an account",
        method: Post,
        path: "/accounts",
        bindings: &[
            Binding::body("accountName", "account.name", STRING).required(),
            Binding::body("offbudget", "account.offbudget", Boolean),
            Binding::body("closed", "account.closed", Boolean),
            Binding::body("initialBalance", "initialBalance", Number),
        ],
    },
    EndpointDef {
        resource: Resource::Account,
        operation: "getBalance",
        display_name: "Get Balance",
        description: "Get the balance of an account",
        method: Get,
        path: "/accounts/{accountId}/balance",
        bindings: &[
            Binding::path("accountId"),
            Binding::query("cutoff", "cutoff", STRING).transform(NonEmpty),
        ],
    },
    EndpointDef {
        resource: Resource::Account,
        operation: "update",
        display_name: "Update",
        description: "Update an account",
        method: Put,
        path: "/accounts/{accountId}",
        bindings: &[Binding::path("accountId"), UPDATE_FIELDS],
    },
    EndpointDef {
        resource: Resource::Account,
        operation: "delete",
        display_name: "Delete",
        description: "Delete an account",
        method: Delete,
        path: "/accounts/{accountId}",
        bindings: &[Binding::path("accountId")],
    },
    EndpointDef {
        resource: Resource::Account,
        operation: "close",
        display_name: "Close",
        description: "Close an account",
        method: Post,
        path: "/accounts/{accountId}/close",
        bindings: &[
            Binding::path("accountId"),
            Binding::body("transferAccountId", "transferAccountId", STRING).transform(NonEmpty),
            Binding::body("transferCategoryId", "categoryId", STRING).transform(NonEmpty),
        ],
    },
    EndpointDef {
        resource: Resource::Account,
        operation: "reopen",
        display_name: "Reopen",
        description: "Reopen a closed account",
        method: Post,
        path: "/accounts/{accountId}/reopen",
        bindings: &[Binding::path("accountId")],
    },
    // Transactions
    EndpointDef {
        resource: Resource::Transaction,
        operation: "getAll",
        display_name: "Get Many",
        description: "Get transactions for an account",
        method: Get,
        path: "/accounts/{accountId}/transactions",
        bindings: &[
            Binding::path("accountId"),
            Binding::query("filters.start", "start", STRING).transform(NonEmpty),
            Binding::query("filters.end", "end", STRING).transform(NonEmpty),
        ],
    },
    EndpointDef {
        resource: Resource::Transaction,
        operation: "create",
        display_name: "Create",
        description: "Add transactions to an account",
        method: Post,
        path: "/accounts/{accountId}/transactions",
        bindings: &[
            Binding::path("accountId"),
            Binding::body("transactions.transaction", "transactions", FixedCollection).required(),
            Binding::body("options.runTransfers", "runTransfers", Boolean),
            Binding::body("options.learnCategories", "learnCategories", Boolean),
        ],
    },
    EndpointDef {
        resource: Resource::Transaction,
        operation: "import",
        display_name: "Import",
        description: "Import transactions with reconciliation",
        method: Post,
        path: "/accounts/{accountId}/transactions/import",
        bindings: &[
            Binding::path("accountId"),
            Binding::body("transactions.transaction", "transactions", FixedCollection).required(),
        ],
    },
    EndpointDef {
        resource: Resource::Transaction,
        operation: "update",
        display_name: "Update",
        description: "Update a transaction",
        method: Put,
        path: "/transactions/{transactionId}",
        bindings: &[Binding::path("transactionId"), UPDATE_FIELDS],
    },
    EndpointDef {
        resource: Resource::Transaction,
        operation: "delete",
        display_name: "Delete",
        description: "Delete a transaction",
        method: Delete,
        path: "/transactions/{transactionId}",
        bindings: &[Binding::path("transactionId")],
    },
    // Budgets
    EndpointDef {
        resource: Resource::Budget,
        operation: "getMonths",
        display_name: "Get Months",
        description: "List budget months",
        method: Get,
        path: "/budgets/months",
        bindings: &[],
    },
    EndpointDef {
        resource: Resource::Budget,
        operation: "getMonth",
        display_name: "Get Month",
        description: "Get the budget for a month",
        method: Get,
        path: "/budgets/{month}",
        bindings: &[Binding::path("month")],
    },
    EndpointDef {
        resource: Resource::Budget,
        operation: "setCategoryBudget",
        display_name: "Set Category Budget",
        description: "Set the budgeted amount for a category",
        method: Post,
        path: "/budgets/{month}/categories/{categoryId}/budget",
        bindings: &[
            Binding::path("month"),
            Binding::path("categoryId"),
            Binding::body("amount", "amount", Number).required(),
        ],
    },
    EndpointDef {
        resource: Resource::Budget,
        operation: "setCategoryCarryover",
        display_name: "Set Category Carryover",
        description: "Enable or disable carryover for a category",
        method: Post,
        path: "/budgets/{month}/categories/{categoryId}/carryover",
        bindings: &[
            Binding::path("month"),
            Binding::path("categoryId"),
            Binding::body("flag", "flag", Boolean).required(),
        ],
    },
    EndpointDef {
        resource: Resource::Budget,
        operation: "hold",
        display_name: "Hold Budget",
        description: "Hold funds for next month",
        method: Post,
        path: "/budgets/{month}/hold",
        bindings: &[Binding::path("month"), Binding::body("amount", "amount", Number).required()],
    },
    EndpointDef {
        resource: Resource::Budget,
        operation: "resetHold",
        display_name: "Reset Hold",
        description: "Release held funds",
        method: Post,
        path: "/budgets/{month}/reset-hold",
        bindings: &[Binding::path("month")],
    },
    // Categories
    EndpointDef {
        resource: Resource::Category,
        operation: "getAll",
        display_name: "Get Many",
        description: "Get all categories",
        method: Get,
        path: "/categories",
        bindings: &[],
    },
    EndpointDef {
        resource: Resource::Category,
        operation: "create",
        display_name: "Create",
        description: "Create a category",
        method: Post,
        path: "/categories",
        bindings: &[
            Binding::body("categoryName", "category.name", STRING).required(),
            Binding::body("groupId", "category.group_id", STRING).transform(NonEmpty),
        ],
    },
    EndpointDef {
        resource: Resource::Category,
        operation: "update",
        display_name: "Update",
        description: "Update a category",
        method: Put,
        path: "/categories/{categoryId}",
        bindings: &[Binding::path("categoryId"), UPDATE_FIELDS],
    },
    EndpointDef {
        resource: Resource::Category,
        operation: "delete",
        display_name: "Delete",
        description: "Delete a category",
        method: Delete,
        path: "/categories/{categoryId}",
        bindings: &[Binding::path("categoryId")],
    },
    // Category groups
    EndpointDef {
        resource: Resource::CategoryGroup,
        operation: "getAll",
        display_name: "Get Many",
        description: "Get all category groups",
        method: Get,
        path: "/category-groups",
        bindings: &[],
    },
    EndpointDef {
        resource: Resource::CategoryGroup,
        operation: "create",
        display_name: "Create",
        description: "Create a category group",
        method: Post,
        path: "/category-groups",
        bindings: &[
            Binding::body("groupName", "group.name", STRING).required(),
            Binding::body("isIncome", "group.is_income", Boolean),
        ],
    },
    EndpointDef {
        resource: Resource::CategoryGroup,
        operation: "update",
        display_name: "Update",
        description: "Update a category group",
        method: Put,
        path: "/category-groups/{groupId}",
        bindings: &[Binding::path("groupId"), UPDATE_FIELDS],
    },
    EndpointDef {
        resource: Resource::CategoryGroup,
        operation: "delete",
        display_name: "Delete",
        description: "Delete a category group",
        method: Delete,
        path: "/category-groups/{groupId}",
        bindings: &[Binding::path("groupId")],
    },
    // Payees
    EndpointDef {
        resource: Resource::Payee,
        operation: "getAll",
        display_name: "Get Many",
        description: "Get all payees",
        method: Get,
        path: "/payees",
        bindings: &[],
    },
    EndpointDef {
        resource: Resource::Payee,
        operation: "create",
        display_name: "Create",
        description: "Create a payee",
        method: Post,
        path: "/payees",
        bindings: &[
            Binding::body("payeeName", "payee.name", STRING).required(),
            Binding::body("transferAccountId", "payee.transfer_acct", STRING).transform(NonEmpty),
        ],
    },
    EndpointDef {
        resource: Resource::Payee,
        operation: "update",
        display_name: "Update",
        description: "Update a payee",
        method: Put,
        path: "/payees/{payeeId}",
        bindings: &[Binding::path("payeeId"), UPDATE_FIELDS],
    },
    EndpointDef {
        resource: Resource::Payee,
        operation: "delete",
        display_name: "Delete",
        description: "Delete a payee",
        method: Delete,
        path: "/payees/{payeeId}",
        bindings: &[Binding::path("payeeId")],
    },
    EndpointDef {
        resource: Resource::Payee,
        operation: "merge",
        display_name: "Merge",
        description: "Merge payees into a target payee",
        method: Post,
        path: "/payees/merge",
        bindings: &[
            Binding::body("targetId", "targetId", STRING).required(),
            Binding::body("mergeIds", "mergeIds", STRING).required().transform(CommaList),
        ],
    },
    // Health
    EndpointDef {
        resource: Resource::Health,
        operation: "check",
        display_name: "Check",
        description: "Check API health",
        method: Get,
        path: "/health",
        bindings: &[],
    },
    // Metrics
    EndpointDef {
        resource: Resource::Metrics,
        operation: "getFull",
        display_name: "Get Full",
        description: "Get all API metrics",
        method: Get,
        path: "/metrics",
        bindings: &[],
    },
    EndpointDef {
        resource: Resource::Metrics,
        operation: "getSummary",
        display_name: "Get Summary",
        description: "Get a metrics summary",
        method: Get,
        path: "/metrics/summary",
        bindings: &[],
    },
    EndpointDef {
        resource: Resource::Metrics,
        operation: "reset",
        display_name: "Reset",
        description: "Reset API metrics",
        method: Post,
        path: "/metrics/reset",
        bindings: &[],
    },
    // ActualQL
    EndpointDef {
        resource: Resource::Query,
        operation: "execute",
        display_name: "Execute",
        description: "Run an ActualQL query",
        method: Post,
        path: "/query",
        bindings: &[
            Binding::body("table", "query.table", Options).required().transform(QueryTable),
            Binding::body("select", "query.select", Options)
                .transform(SelectFields { custom_source: "customFields" })
                .default_value("*"),
            Binding::body("filter", "query.filter", Json).transform(JsonFilter),
            Binding::body("options.limit", "query.options.limit", Number).transform(QueryLimit),
        ],
    },
];
