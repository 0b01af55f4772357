use clap::{Args, Subcommand};
use model::pagination::request::SortOrder;
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// Database URL; falls back to MMQ_DATABASE_URL
    #[arg(long)]
    pub conn_str: Option<String>,

    /// Data format: "postgres" or "mysql"; guessed from the URL when omitted
    #[arg(long)]
    pub format: Option<String>,

    #[arg(long, help = "Extra .env file to load before resolving settings")]
    pub env_file: Option<PathBuf>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct PageArgs {
    #[arg(long, default_value_t = 0, help = "Zero-based page index")]
    pub page: u64,

    #[arg(long, help = "Page size; falls back to MMQ_PAGE_SIZE")]
    pub size: Option<u64>,

    #[arg(
        long = "sort",
        help = "Sort as property[,asc|desc]; may be repeated"
    )]
    pub sort: Vec<SortOrder>,

    #[arg(
        long,
        help = "If specified, writes the JSON page to this file instead of stdout"
    )]
    pub output: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search releases
    Releases {
        #[command(flatten)]
        conn: ConnectionArgs,

        #[command(flatten)]
        page: PageArgs,

        #[arg(long)]
        name_regex: Option<String>,

        #[arg(long)]
        game_version_id: Option<Uuid>,

        #[arg(long)]
        mapping_type_id: Option<Uuid>,

        #[arg(long)]
        is_snapshot: Option<bool>,

        #[arg(long, help = "Only releases containing this mapping")]
        mapping_id: Option<Uuid>,

        #[arg(long, help = "Only releases created by this user")]
        user_id: Option<Uuid>,
    },
    /// Search mapping types
    MappingTypes {
        #[command(flatten)]
        conn: ConnectionArgs,

        #[command(flatten)]
        page: PageArgs,

        #[arg(long)]
        name_regex: Option<String>,

        #[arg(long)]
        editable: Option<bool>,

        #[arg(long, help = "Hide mapping types that are not externally visible")]
        externally_visible_only: bool,
    },
    /// Search game versions
    GameVersions {
        #[command(flatten)]
        conn: ConnectionArgs,

        #[command(flatten)]
        page: PageArgs,

        #[arg(long)]
        name_regex: Option<String>,

        #[arg(long)]
        is_pre_release: Option<bool>,

        #[arg(long)]
        is_snapshot: Option<bool>,
    },
    /// Print the data and count statements of a release search without running them
    Explain {
        #[arg(long, default_value = "postgres", help = "SQL dialect: postgres, mysql or sqlite")]
        dialect: String,

        #[command(flatten)]
        page: PageArgs,

        #[arg(long)]
        name_regex: Option<String>,

        #[arg(long)]
        game_version_id: Option<Uuid>,

        #[arg(long)]
        mapping_id: Option<Uuid>,
    },
    /// Test a connection string against a given format
    TestConn {
        #[command(flatten)]
        conn: ConnectionArgs,
    },
}
