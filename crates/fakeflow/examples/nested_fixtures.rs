use std::sync::Arc;

use fake::Dummy;
use fakeflow::logging::init_logging;
use fakeflow::{
    Context, DeferredExt, FakerEntity, FakerOptions, Settings, TaskRef, create, for_each,
    for_the_first, in_parallel,
};
use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, Serialize, Dummy)]
struct Admin {
    id: u32,
    email: String,
}

#[derive(Debug, Clone, Serialize, Dummy)]
struct Author {
    id: u32,
    name: String,
}

#[derive(Debug, Clone, Serialize, Dummy)]
struct Post {
    title: String,
    body: String,
}

#[derive(Debug, Clone, Serialize, Dummy)]
struct Award {
    label: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging("info")?;

    let settings = Settings::from_env()?;
    let context = Context::new();

    let admins = Arc::new(FakerEntity::<Admin>::new());
    let authors = Arc::new(FakerEntity::<Author>::new());
    let posts = Arc::new(FakerEntity::<Post>::new());
    let awards = Arc::new(FakerEntity::<Award>::new());

    let seeded = |index: usize, _: &Author, author_index: Option<usize>| {
        FakerOptions::seeded((author_index.unwrap_or_default() * 100 + index) as u64)
    };

    let counts = in_parallel(vec![
        TaskRef::from(
            create(1, admins)
                .entry()
                .chain(context.remember_as("admins"))
                .then_with(|admins| admins.len()),
        ),
        create(3, authors.clone())
            .map_options(settings.map_options())
            .entries()
            .chain(context.remember_as("authors"))
            .chain(for_each(
                create(2, posts)
                    .per_item(seeded)
                    .map_options(settings.map_options())
                    .task(),
            ))
            .then_with(|per_author| per_author.into_iter().flatten().count())
            .into(),
        create(5, authors)
            .entries()
            .chain(for_the_first(create(1, awards).task()))
            .then_with(|awards| awards.len())
            .into(),
    ])
    .await?;

    info!(
        event = "fixtures_ready",
        admins = counts[0],
        posts = counts[1],
        awards = counts[2],
        remembered = context.len()
    );

    if let Some(authors) = context.get::<Vec<Author>>("authors") {
        for author in &authors {
            info!(event = "author", id = author.id, name = %author.name);
        }
    }

    Ok(())
}
