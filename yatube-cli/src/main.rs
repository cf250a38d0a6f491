use std::fs;
use std::path::Path;

use anyhow::Context;
use clap::{Parser, Subcommand};
use uuid::Uuid;
use yatube_client::{PostInput, YatubeClient};

const TOKEN_FILE: &str = ".yatube_token";

#[derive(Parser, Debug)]
#[command(name = "yatube", about = "Command-line client for the Yatube API")]
struct Cli {
    #[arg(short, long, default_value = "http://127.0.0.1:8080")]
    server: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    #[command(subcommand)]
    Posts(PostsCommand),
    #[command(subcommand)]
    Groups(GroupsCommand),
    #[command(subcommand)]
    Comments(CommentsCommand),
    #[command(subcommand)]
    Follow(FollowCommand),
}

#[derive(Subcommand, Debug)]
enum PostsCommand {
    List {
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        offset: Option<u32>,
    },
    Get {
        id: Uuid,
    },
    Create {
        #[arg(long)]
        text: String,
        #[arg(long)]
        group: Option<Uuid>,
        #[arg(long)]
        image: Option<String>,
    },
    Update {
        id: Uuid,
        #[arg(long)]
        text: Option<String>,
        #[arg(long)]
        group: Option<Uuid>,
        #[arg(long)]
        image: Option<String>,
    },
    Delete {
        id: Uuid,
    },
}

#[derive(Subcommand, Debug)]
enum GroupsCommand {
    List,
    Get { id: Uuid },
}

#[derive(Subcommand, Debug)]
enum CommentsCommand {
    List {
        post_id: Uuid,
    },
    Create {
        post_id: Uuid,
        #[arg(long)]
        text: String,
    },
    Delete {
        post_id: Uuid,
        id: Uuid,
    },
}

#[derive(Subcommand, Debug)]
enum FollowCommand {
    List {
        #[arg(long)]
        search: Option<String>,
    },
    Add {
        username: String,
    },
}

fn load_token(path: &Path) -> Option<String> {
    fs::read_to_string(path).ok().map(|t| t.trim().to_string())
}

fn save_token(path: &Path, token: &str) -> anyhow::Result<()> {
    fs::write(path, token).with_context(|| format!("failed to write {}", path.display()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    let token_path = Path::new(TOKEN_FILE);

    let mut client = YatubeClient::connect(&args.server)?.with_token(load_token(token_path));

    match args.command {
        Command::Register {
            username,
            email,
            password,
        } => {
            let auth = client.register(&username, &email, &password).await?;
            save_token(token_path, &auth.access_token)?;
            println!("Registered {username}, token saved to {TOKEN_FILE}");
        }
        Command::Login { username, password } => {
            let auth = client.login(&username, &password).await?;
            save_token(token_path, &auth.access_token)?;
            println!("Logged in as {username}, token valid for {}s", auth.expires_in);
        }
        Command::Posts(cmd) => match cmd {
            PostsCommand::List { limit, offset } => {
                let page = client.list_posts(limit, offset).await?;
                println!("{} posts total", page.count);
                for post in page.results {
                    println!("{post}");
                }
                if let Some(next) = page.next {
                    println!("next: {next}");
                }
            }
            PostsCommand::Get { id } => {
                println!("{}", client.get_post(id).await?);
            }
            PostsCommand::Create { text, group, image } => {
                let input = PostInput {
                    text: Some(text),
                    group,
                    image,
                };
                let post = client.create_post(&input).await?;
                println!("Created {}", post.id);
            }
            PostsCommand::Update {
                id,
                text,
                group,
                image,
            } => {
                let post = client
                    .update_post(id, &PostInput { text, group, image })
                    .await?;
                println!("Updated {post}");
            }
            PostsCommand::Delete { id } => {
                client.delete_post(id).await?;
                println!("Deleted {id}");
            }
        },
        Command::Groups(cmd) => match cmd {
            GroupsCommand::List => {
                for group in client.list_groups().await? {
                    println!("[{}] {} ({})", group.id, group.title, group.slug);
                }
            }
            GroupsCommand::Get { id } => {
                let group = client.get_group(id).await?;
                println!("{} ({})\n{}", group.title, group.slug, group.description);
            }
        },
        Command::Comments(cmd) => match cmd {
            CommentsCommand::List { post_id } => {
                for comment in client.list_comments(post_id).await? {
                    println!("{comment}");
                }
            }
            CommentsCommand::Create { post_id, text } => {
                let comment = client.create_comment(post_id, &text).await?;
                println!("Created {}", comment.id);
            }
            CommentsCommand::Delete { post_id, id } => {
                client.delete_comment(post_id, id).await?;
                println!("Deleted {id}");
            }
        },
        Command::Follow(cmd) => match cmd {
            FollowCommand::List { search } => {
                for follow in client.list_follows(search.as_deref()).await? {
                    println!("{} -> {}", follow.user, follow.following);
                }
            }
            FollowCommand::Add { username } => {
                let follow = client.follow(&username).await?;
                println!("{} now follows {}", follow.user, follow.following);
            }
        },
    }

    Ok(())
}
