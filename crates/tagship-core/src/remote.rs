/// Organisation and repository name parsed from a git remote URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRepo {
    pub host: String,
    /// Everything between the host and the repository name. For nested
    /// groups (`group/subgroup/repo`) this is `group/subgroup`.
    pub organisation: String,
    pub name: String,
}

impl RemoteRepo {
    /// Parse any of the common remote URL forms:
    ///
    /// - `git@host:org/repo.git`
    /// - `ssh://git@host[:port]/org/repo.git`
    /// - `https://[user@]host/org/repo[.git][/]`
    pub fn parse(url: &str) -> Option<Self> {
        let url = url.trim();

        let (host, path) = if let Some(rest) = url
            .strip_prefix("https://")
            .or_else(|| url.strip_prefix("http://"))
            .or_else(|| url.strip_prefix("ssh://"))
            .or_else(|| url.strip_prefix("git://"))
        {
            let (authority, path) = rest.split_once('/')?;
            // Drop credentials and port
            let host = authority.rsplit('@').next().unwrap_or(authority);
            let host = host.split(':').next().unwrap_or(host);
            (host, path)
        } else {
            // scp-like: user@host:path
            let (authority, path) = url.split_once(':')?;
            if authority.contains('/') {
                return None;
            }
            let host = authority.rsplit('@').next().unwrap_or(authority);
            (host, path)
        };

        let path = path.trim_matches('/');
        let path = path.strip_suffix(".git").unwrap_or(path);
        let (organisation, name) = path.rsplit_once('/')?;
        let organisation = organisation.trim_matches('/');

        if host.is_empty() || organisation.is_empty() || name.is_empty() {
            return None;
        }

        Some(Self {
            host: host.to_owned(),
            organisation: organisation.to_owned(),
            name: name.to_owned(),
        })
    }
}
