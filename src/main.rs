use anyhow::bail;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use glite::engine::Engine;
use glite::hashing::ArgonCredentials;
use glite::objects::object_id::ObjectId;
use glite::storage::config::Visibility;
use glite::storage::Storage;

#[derive(Parser)]
#[command(
    name = "glite",
    version = "0.1.0",
    about = "A local, multi-user git-like version control engine",
    long_about = "glite keeps users, repositories, commits, branches, tags and local \
    mirrors under a single storage root, with collaborator-based permissions. \
    This binary is a thin, non-interactive front end over the engine."
)]
struct Cli {
    /// Storage root directory
    #[arg(long, default_value = "./storage", global = true)]
    root: PathBuf,

    /// Username to authenticate as
    #[arg(long, global = true)]
    user: Option<String>,

    /// Password for --user
    #[arg(long, global = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new user (the first user becomes admin)
    Register { username: String, password: String },
    /// Create a repository in your namespace
    Create { name: String },
    /// Delete a repository and its permissions entry
    Delete { repo: String },
    /// List a user's repositories (defaults to your own)
    List { username: Option<String> },
    /// List every repository with its visibility (admin only)
    Repos,
    /// List registered users
    Users,
    /// Stage a workspace file
    Add { repo: String, file: String },
    /// Show staged entries
    Status { repo: String },
    /// Show a listing of staged paths
    Diff { repo: String },
    /// Unstage a file and delete it from the working tree
    Rm { repo: String, file: String },
    /// Unstage a file, leaving the working tree alone
    Unstage { repo: String, file: String },
    /// Append a pattern to .gliteignore
    Ignore { repo: String, pattern: String },
    /// Commit the staged files
    Commit {
        repo: String,
        #[arg(short, long)]
        message: String,
    },
    /// Show commit history for a branch
    Log {
        repo: String,
        #[arg(long)]
        branch: Option<String>,
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// List branches, or create one
    Branch {
        repo: String,
        name: Option<String>,
    },
    /// Switch HEAD to another branch (the working tree is untouched)
    Checkout { repo: String, branch: String },
    /// Merge a branch into the current one
    Merge { repo: String, branch: String },
    /// Reset the current branch to another branch's head
    Rebase { repo: String, branch: String },
    /// Rename a branch
    RenameBranch {
        repo: String,
        old: String,
        new: String,
    },
    /// Delete a branch
    DeleteBranch { repo: String, name: String },
    /// List tags, or create one at the current head
    Tag {
        repo: String,
        name: Option<String>,
    },
    /// Create a commit undoing another commit
    Revert { repo: String, commit: String },
    /// Push the repository to its mirror
    Push { repo: String },
    /// Pull the repository back from its mirror
    Pull { repo: String },
    /// Fork an accessible repository into your namespace
    Fork { repo: String },
    /// Move a repository to another user's namespace
    Transfer { repo: String, new_owner: String },
    /// Copy an accessible repository to a directory
    Clone { repo: String, destination: PathBuf },
    /// Set repository visibility
    Visibility {
        repo: String,
        #[arg(value_parser = ["public", "private"])]
        state: String,
    },
    /// Manage collaborators
    Perm {
        #[command(subcommand)]
        command: PermCommands,
    },
    /// Promote a user to admin
    MakeAdmin { username: String },
    /// Demote an admin to a regular user
    RemoveAdmin { username: String },
}

#[derive(Subcommand)]
enum PermCommands {
    Add { repo: String, username: String },
    Rm { repo: String, username: String },
    List { repo: String },
}

/// Split `owner/name`, defaulting the owner to the session user.
fn parse_repo_id(value: &str, engine: &Engine) -> anyhow::Result<(String, String)> {
    match value.split_once('/') {
        Some((owner, name)) if !owner.is_empty() && !name.is_empty() => {
            Ok((owner.to_string(), name.to_string()))
        }
        Some(_) => bail!("invalid repository identifier '{value}'"),
        None => match engine.session() {
            Some(session) => Ok((session.username.clone(), value.to_string())),
            None => bail!("not logged in"),
        },
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let storage = Storage::open(&cli.root)?;
    let mut engine = Engine::new(storage, Box::new(ArgonCredentials::new()));

    if let (Some(user), Some(password)) = (&cli.user, &cli.password) {
        engine.login(user, password)?;
    }

    match &cli.command {
        Commands::Register { username, password } => {
            let user = engine.register(username, password)?;
            println!("Registered '{}' with role {}.", user.username, user.role);
        }
        Commands::Create { name } => {
            engine.create_repo(name)?;
            println!("Created repository '{name}'.");
        }
        Commands::Delete { repo } => {
            let (owner, name) = parse_repo_id(repo, &engine)?;
            engine.delete_repo(&owner, &name)?;
            println!("Deleted repository '{owner}/{name}'.");
        }
        Commands::List { username } => {
            let username = match (username, engine.session()) {
                (Some(explicit), _) => explicit.clone(),
                (None, Some(session)) => session.username.clone(),
                (None, None) => bail!("not logged in"),
            };
            for repo in engine.storage().list_user_repos(&username)? {
                println!("{username}/{repo}");
            }
        }
        Commands::Repos => {
            for (owner, repo, visibility) in engine.list_all_repos_with_visibility()? {
                println!("{owner}/{repo} [{visibility}]");
            }
        }
        Commands::Users => {
            for (username, role) in engine.list_users()? {
                println!("{username} ({role})");
            }
        }
        Commands::Add { repo, file } => {
            let (owner, name) = parse_repo_id(repo, &engine)?;
            let oid = engine.open_repo_for_write(&owner, &name)?.add_file(file)?;
            println!("Staged '{file}' as {}.", oid.to_short_oid());
        }
        Commands::Status { repo } => {
            let (owner, name) = parse_repo_id(repo, &engine)?;
            let entries = engine.open_repo_for_read(&owner, &name)?.status()?;
            if entries.is_empty() {
                println!("Nothing staged.");
            }
            for entry in entries {
                println!("{}\t{}", entry.path, entry.oid);
            }
        }
        Commands::Diff { repo } => {
            let (owner, name) = parse_repo_id(repo, &engine)?;
            print!("{}", engine.open_repo_for_read(&owner, &name)?.get_diff()?);
        }
        Commands::Rm { repo, file } => {
            let (owner, name) = parse_repo_id(repo, &engine)?;
            engine.open_repo_for_write(&owner, &name)?.remove_file(file)?;
            println!("Removed '{file}'.");
        }
        Commands::Unstage { repo, file } => {
            let (owner, name) = parse_repo_id(repo, &engine)?;
            engine.open_repo_for_write(&owner, &name)?.reset_file(file)?;
            println!("Unstaged '{file}'.");
        }
        Commands::Ignore { repo, pattern } => {
            let (owner, name) = parse_repo_id(repo, &engine)?;
            engine
                .open_repo_for_write(&owner, &name)?
                .add_ignore_pattern(pattern)?;
            println!("Added ignore pattern '{pattern}'.");
        }
        Commands::Commit { repo, message } => {
            let (owner, name) = parse_repo_id(repo, &engine)?;
            let author = engine
                .session()
                .map(|session| session.username.clone())
                .ok_or_else(|| anyhow::anyhow!("not logged in"))?;
            let record = engine
                .open_repo_for_write(&owner, &name)?
                .commit(&author, message)?;
            println!(
                "[{} {}] {}",
                record.branch(),
                record.id().to_short_oid(),
                record.message()
            );
        }
        Commands::Log {
            repo,
            branch,
            limit,
        } => {
            let (owner, name) = parse_repo_id(repo, &engine)?;
            let repository = engine.open_repo_for_read(&owner, &name)?;
            let branch = match branch {
                Some(branch) => branch.clone(),
                None => repository.current_branch()?,
            };
            for record in repository.history(&branch, *limit)? {
                println!(
                    "{} {} {} {}",
                    record.id().to_short_oid(),
                    record.formatted_timestamp(),
                    record.author(),
                    record.message()
                );
            }
        }
        Commands::Branch { repo, name } => {
            let (owner, repo_name) = parse_repo_id(repo, &engine)?;
            match name {
                Some(name) => {
                    engine
                        .open_repo_for_write(&owner, &repo_name)?
                        .create_branch(name)?;
                    println!("Created branch '{name}'.");
                }
                None => {
                    let repository = engine.open_repo_for_read(&owner, &repo_name)?;
                    let current = repository.current_branch()?;
                    for (branch, head) in repository.list_branches_with_head()? {
                        let marker = if branch == current { "*" } else { " " };
                        let head = head
                            .map(|id| id.to_short_oid())
                            .unwrap_or_else(|| "-".to_string());
                        println!("{marker} {branch} {head}");
                    }
                }
            }
        }
        Commands::Checkout { repo, branch } => {
            let (owner, name) = parse_repo_id(repo, &engine)?;
            engine
                .open_repo_for_write(&owner, &name)?
                .set_current_branch(branch)?;
            println!("Switched to branch '{branch}'.");
        }
        Commands::Merge { repo, branch } => {
            let (owner, name) = parse_repo_id(repo, &engine)?;
            let record = engine
                .open_repo_for_write(&owner, &name)?
                .merge_branch(branch)?;
            println!("{}", record.message());
        }
        Commands::Rebase { repo, branch } => {
            let (owner, name) = parse_repo_id(repo, &engine)?;
            engine
                .open_repo_for_write(&owner, &name)?
                .rebase_branch(branch)?;
            println!("Rebased onto '{branch}'.");
        }
        Commands::RenameBranch { repo, old, new } => {
            let (owner, name) = parse_repo_id(repo, &engine)?;
            engine
                .open_repo_for_write(&owner, &name)?
                .rename_branch(old, new)?;
            println!("Renamed branch '{old}' to '{new}'.");
        }
        Commands::DeleteBranch { repo, name } => {
            let (owner, repo_name) = parse_repo_id(repo, &engine)?;
            engine
                .open_repo_for_write(&owner, &repo_name)?
                .delete_branch(name)?;
            println!("Deleted branch '{name}'.");
        }
        Commands::Tag { repo, name } => {
            let (owner, repo_name) = parse_repo_id(repo, &engine)?;
            match name {
                Some(name) => {
                    engine
                        .open_repo_for_write(&owner, &repo_name)?
                        .create_tag(name)?;
                    println!("Created tag '{name}'.");
                }
                None => {
                    let mut tags = engine.open_repo_for_read(&owner, &repo_name)?.list_tags()?;
                    tags.sort();
                    for tag in tags {
                        println!("{tag}");
                    }
                }
            }
        }
        Commands::Revert { repo, commit } => {
            let (owner, name) = parse_repo_id(repo, &engine)?;
            let author = engine
                .session()
                .map(|session| session.username.clone())
                .ok_or_else(|| anyhow::anyhow!("not logged in"))?;
            let commit_id = ObjectId::try_parse(commit.clone())?;
            let record = engine
                .open_repo_for_write(&owner, &name)?
                .revert_commit(&commit_id, &author)?;
            println!("{}", record.message());
        }
        Commands::Push { repo } => {
            let (owner, name) = parse_repo_id(repo, &engine)?;
            engine.push_repo(&owner, &name)?;
            println!("Pushed '{owner}/{name}' to its mirror.");
        }
        Commands::Pull { repo } => {
            let (owner, name) = parse_repo_id(repo, &engine)?;
            engine.pull_repo(&owner, &name)?;
            println!("Pulled '{owner}/{name}' from its mirror.");
        }
        Commands::Fork { repo } => {
            let (owner, name) = parse_repo_id(repo, &engine)?;
            let fork_name = engine.fork(&owner, &name)?;
            println!("Forked '{owner}/{name}' to '{fork_name}'.");
        }
        Commands::Transfer { repo, new_owner } => {
            let (owner, name) = parse_repo_id(repo, &engine)?;
            engine.transfer(&owner, &name, new_owner)?;
            println!("Transferred '{name}' to '{new_owner}'.");
        }
        Commands::Clone { repo, destination } => {
            let (owner, name) = parse_repo_id(repo, &engine)?;
            engine.clone_repo(&owner, &name, destination)?;
            println!("Cloned '{owner}/{name}' to '{}'.", destination.display());
        }
        Commands::Visibility { repo, state } => {
            let (owner, name) = parse_repo_id(repo, &engine)?;
            let visibility = if state == "public" {
                Visibility::Public
            } else {
                Visibility::Private
            };
            engine.set_visibility(&owner, &name, visibility)?;
            println!("Repository '{owner}/{name}' is now {visibility}.");
        }
        Commands::Perm { command } => match command {
            PermCommands::Add { repo, username } => {
                let (owner, name) = parse_repo_id(repo, &engine)?;
                engine.add_collaborator(&owner, &name, username)?;
                println!("Added collaborator '{username}' to '{owner}/{name}'.");
            }
            PermCommands::Rm { repo, username } => {
                let (owner, name) = parse_repo_id(repo, &engine)?;
                engine.remove_collaborator(&owner, &name, username)?;
                println!("Removed collaborator '{username}' from '{owner}/{name}'.");
            }
            PermCommands::List { repo } => {
                let (owner, name) = parse_repo_id(repo, &engine)?;
                for username in engine.list_collaborators(&owner, &name)? {
                    println!("{username}");
                }
            }
        },
        Commands::MakeAdmin { username } => {
            engine.make_admin(username)?;
            println!("User '{username}' promoted to admin.");
        }
        Commands::RemoveAdmin { username } => {
            engine.remove_admin(username)?;
            println!("User '{username}' demoted to regular user.");
        }
    }

    Ok(())
}
