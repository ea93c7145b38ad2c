pub mod shared {
    pub mod infrastructure {
        pub mod retry;
    }
}

pub mod modules {
    pub mod gallery {
        pub mod core {
            pub mod events;
            pub mod item;
            pub mod merge;
        }
        pub mod use_cases {
            pub mod reconcile_item {
                pub mod handler;
                pub mod lane;
                pub mod inbound {
                    pub mod http;
                }
            }
            pub mod list_items_by_category {
                pub mod inbound {
                    pub mod graphql;
                    pub mod http;
                }
                pub mod queries_port;
            }
        }
        pub mod adapters {
            pub mod outbound {
                pub mod item_store;
                pub mod item_store_in_memory;
            }
        }
    }
}

pub mod shell;
