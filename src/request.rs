//! Background jobs, their replies, and the generation tickets that let the
//! UI thread throw away replies nobody is waiting for anymore.

use crate::api::RepoApi;
use crate::fetch::Fetch;
use crate::history::Commit;
use crate::loader::ContentLoader;

/// A kind of remote data with its own loading flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Resource {
    Repositories,
    Tree,
    History,
    Content,
}

impl Resource {
    const COUNT: usize = 4;

    const fn slot(self) -> usize {
        match self {
            Self::Repositories => 0,
            Self::Tree => 1,
            Self::History => 2,
            Self::Content => 3,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ticket {
    pub resource: Resource,
    pub generation: u64,
}

/// Latest issued generation per resource.
#[derive(Clone, Debug, Default)]
pub struct Generations {
    current: [u64; Resource::COUNT],
}

impl Generations {
    /// Issues a fresh ticket, superseding every earlier one for `resource`.
    pub const fn issue(&mut self, resource: Resource) -> Ticket {
        let slot = resource.slot();
        self.current[slot] = self.current[slot].wrapping_add(1);
        Ticket {
            resource,
            generation: self.current[slot],
        }
    }

    pub const fn is_current(&self, ticket: Ticket) -> bool {
        self.current[ticket.resource.slot()] == ticket.generation
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Request {
    Repositories,
    Tree { repo: String, branch: String },
    History { repo: String },
    Content {
        repo: String,
        branch: String,
        path: String,
        name: String,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Job {
    pub ticket: Ticket,
    pub request: Request,
}

impl Job {
    /// Performs the request. Blocking; runs on a worker thread.
    pub fn run<A: RepoApi + ?Sized>(self, api: &A) -> Reply {
        let payload = match self.request {
            Request::Repositories => {
                Payload::Repositories(Fetch::settle(api.list_repositories(), "repository list"))
            }
            Request::Tree { repo, branch } => {
                Payload::Tree(Fetch::settle(api.list_files(&repo, &branch), "file list"))
            }
            Request::History { repo } => {
                Payload::History(Fetch::settle(api.history(&repo), "commit history"))
            }
            Request::Content {
                repo,
                branch,
                path,
                name,
            } => Payload::Content {
                name,
                content: ContentLoader::new(api).on_branch(&branch).fetch(&repo, &path),
            },
        };
        Reply {
            ticket: self.ticket,
            payload,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reply {
    pub ticket: Ticket,
    pub payload: Payload,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Payload {
    Repositories(Fetch<Vec<String>>),
    Tree(Fetch<Vec<String>>),
    History(Fetch<Vec<Commit>>),
    Content { name: String, content: Fetch<String> },
}
