use crate::areas::repository::Repository;
use crate::error::{Error, Result};
use crate::identity::validate_identifier;

impl Repository {
    /// Freeze the current branch head under a tag name.
    pub fn create_tag(&self, name: &str) -> Result<()> {
        validate_identifier(name)?;
        let branch = self.refs().current_branch()?;
        let head = self
            .refs()
            .branch_head(&branch)?
            .ok_or_else(|| Error::conflict("no commits to tag"))?;
        self.refs().create_tag(name, &head)
    }

    /// Tag names in directory order; callers sort if they care.
    pub fn list_tags(&self) -> Result<Vec<String>> {
        self.refs().list_tags()
    }
}
