// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::collection::Collection;
use crate::db::RevisionId;
use crate::error::Fallible;

pub fn delete_revision(directory: Option<String>, revision_id: RevisionId) -> Fallible<()> {
    let mut coll = Collection::new(directory)?;
    coll.db.delete_revision(revision_id)?;
    println!("Deleted revision {revision_id}.");
    Ok(())
}
