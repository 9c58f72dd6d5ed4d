use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use station_db::KvStore;
use station_gen::{AiModel, Generator, Strategy};
use station_types::{User, UserDraft};
use station_world::{ExportKind, ImportFormat, Repository, parse_import};
use tracing::info;

use crate::cli::{ChannelCommand, Command, ProfileArgs, UserCommand};

/// Everything one CLI invocation works against.
pub struct Session<S> {
    pub repo: Repository<S>,
    pub generator: Generator,
    pub model: AiModel,
    pub export_dir: PathBuf,
}

impl<S: KvStore> Session<S> {
    pub async fn run(&mut self, command: Command, out: &mut impl Write) -> Result<()> {
        match command {
            Command::Users { cmd } => self.users(cmd, out),
            Command::Channels { cmd } => self.channels(cmd, out),
            Command::Import { file } => self.import(&file, out).await,
            Command::Export { kind } => self.export(kind, out).await.map(|_| ()),
            Command::Generate {
                count,
                strategy,
                commit,
            } => self.generate(count as usize, strategy, commit, out).await,
            Command::Nickname => {
                let nickname = self.generator.generate_nickname().await;
                writeln!(out, "{}", nickname)?;
                Ok(())
            }
            Command::Models => self.models(out),
        }
    }

    fn users(&mut self, cmd: UserCommand, out: &mut impl Write) -> Result<()> {
        match cmd {
            UserCommand::List => {
                if self.repo.users().is_empty() {
                    writeln!(out, "No users yet.")?;
                }
                for user in self.repo.users() {
                    writeln!(out, "{}  {:<20}  {}", user.id, user.nickname, skills_summary(user))?;
                }
            }
            UserCommand::Add { nickname, profile } => {
                let mut draft = UserDraft::new(nickname);
                apply_profile(&mut draft, profile);
                let user = self.repo.create_user(draft)?;
                writeln!(out, "Added {} ({})", user.nickname, user.id)?;
            }
            UserCommand::Edit {
                id,
                nickname,
                profile,
            } => {
                let user = self
                    .repo
                    .user(&id)
                    .cloned()
                    .ok_or_else(|| anyhow!("No user with id {}", id))?;
                let mut draft = user.into_draft();
                if let Some(nickname) = nickname {
                    draft.nickname = nickname;
                }
                apply_profile(&mut draft, profile);
                let user = draft.into_user(id);
                self.repo.update_user(user.clone())?;
                writeln!(out, "Updated {} ({})", user.nickname, user.id)?;
            }
            UserCommand::Remove { id } => {
                if self.repo.remove_user(&id)? {
                    writeln!(out, "Removed user {}", id)?;
                } else {
                    writeln!(out, "No user with id {}", id)?;
                }
            }
        }
        Ok(())
    }

    fn channels(&mut self, cmd: ChannelCommand, out: &mut impl Write) -> Result<()> {
        match cmd {
            ChannelCommand::List => {
                if self.repo.channels().is_empty() {
                    writeln!(out, "No channels yet.")?;
                }
                for channel in self.repo.channels() {
                    let members: Vec<&str> = channel
                        .users
                        .iter()
                        .map(|id| self.repo.user(id).map_or(id.as_str(), |u| u.nickname.as_str()))
                        .collect();
                    writeln!(out, "{}  {}  {}", channel.id, channel.name, channel.topic)?;
                    writeln!(out, "    members: {}", members.join(", "))?;
                }
            }
            ChannelCommand::Add {
                name,
                topic,
                members,
            } => {
                self.check_members(&members)?;
                let channel = self.repo.create_channel(&name, &topic, members)?;
                writeln!(out, "Added {} ({})", channel.name, channel.id)?;
            }
            ChannelCommand::Edit {
                id,
                name,
                topic,
                members,
                clear_members,
            } => {
                let mut channel = self
                    .repo
                    .channel(&id)
                    .cloned()
                    .ok_or_else(|| anyhow!("No channel with id {}", id))?;
                if let Some(name) = name {
                    channel.name = name;
                }
                if let Some(topic) = topic {
                    channel.topic = topic;
                }
                if clear_members {
                    channel.users.clear();
                } else if !members.is_empty() {
                    self.check_members(&members)?;
                    channel.users = members;
                }
                let name = channel.name.clone();
                self.repo.update_channel(channel)?;
                writeln!(out, "Updated {} ({})", name, id)?;
            }
            ChannelCommand::Remove { id } => {
                if self.repo.remove_channel(&id)? {
                    writeln!(out, "Removed channel {}", id)?;
                } else {
                    writeln!(out, "No channel with id {}", id)?;
                }
            }
            ChannelCommand::Clear => {
                let count = self.repo.channels().len();
                self.repo.clear_channels()?;
                writeln!(out, "Removed {} channels", count)?;
            }
            ChannelCommand::Prune => {
                let removed = self.repo.prune_dangling_members()?;
                writeln!(out, "Removed {} dangling memberships", removed)?;
            }
        }
        Ok(())
    }

    fn check_members(&self, members: &[String]) -> Result<()> {
        if let Some(unknown) = members.iter().find(|id| self.repo.user(id).is_none()) {
            bail!("No user with id {}", unknown);
        }
        Ok(())
    }

    async fn import(&mut self, file: &Path, out: &mut impl Write) -> Result<()> {
        let format = ImportFormat::from_path(file)?;
        let text = tokio::fs::read_to_string(file)
            .await
            .with_context(|| format!("Failed to read {}", file.display()))?;

        let payload = parse_import(&text, format)?;
        let summary = self.repo.apply_import(payload)?;
        writeln!(
            out,
            "Imported {} users and {} channels from {}",
            summary.users,
            summary.channels,
            file.display()
        )?;
        Ok(())
    }

    async fn export(&self, kind: ExportKind, out: &mut impl Write) -> Result<PathBuf> {
        let text = {
            let mut rng = rand::rng();
            kind.render(self.repo.users(), self.repo.channels(), &mut rng)?
        };

        tokio::fs::create_dir_all(&self.export_dir)
            .await
            .with_context(|| format!("Failed to create {}", self.export_dir.display()))?;
        let path = self.export_dir.join(kind.file_name());
        tokio::fs::write(&path, text)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;

        info!("Exported {} to {}", kind, path.display());
        writeln!(out, "Wrote {}", path.display())?;
        Ok(path)
    }

    async fn generate(
        &mut self,
        count: usize,
        strategy: Strategy,
        commit: bool,
        out: &mut impl Write,
    ) -> Result<()> {
        if strategy == Strategy::Ai {
            writeln!(out, "Asking {} for {} users...", self.model.display_name(), count)?;
        }
        let existing = self.repo.nicknames();
        let drafts = self.generator.generate(count, strategy, &existing).await?;

        for draft in &drafts {
            writeln!(out, "{:<20}  {}", draft.nickname, draft.personality)?;
        }

        if commit {
            let added = self.repo.add_users(drafts)?;
            writeln!(out, "Saved {} users", added.len())?;
        } else {
            writeln!(out, "Not saved; pass --commit to keep them")?;
        }
        Ok(())
    }

    fn models(&self, out: &mut impl Write) -> Result<()> {
        for model in AiModel::ALL {
            let marker = if model == self.model { '*' } else { ' ' };
            writeln!(
                out,
                "{} {:<20} {:<17} {:<4}  {}",
                marker,
                model.id(),
                model.display_name(),
                model.cost(),
                model.description()
            )?;
        }
        Ok(())
    }
}

/// Overwrites whatever the flags set. Skills are replaced as a whole.
fn apply_profile(draft: &mut UserDraft, profile: ProfileArgs) {
    if let Some(personality) = profile.personality {
        draft.personality = personality;
    }
    if !profile.skills.is_empty() {
        draft.language_skills = profile.skills;
    }
    let style = &mut draft.writing_style;
    if let Some(v) = profile.formality {
        style.formality = v;
    }
    if let Some(v) = profile.verbosity {
        style.verbosity = v;
    }
    if let Some(v) = profile.humor {
        style.humor = v;
    }
    if let Some(v) = profile.emoji_usage {
        style.emoji_usage = v;
    }
    if let Some(v) = profile.punctuation {
        style.punctuation = v;
    }
}

fn skills_summary(user: &User) -> String {
    user.language_skills
        .iter()
        .map(|s| {
            if s.accent.is_empty() {
                format!("{} ({})", s.language, s.fluency)
            } else {
                format!("{} ({}, {})", s.language, s.fluency, s.accent)
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}
