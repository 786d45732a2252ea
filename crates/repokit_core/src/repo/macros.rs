/// Declares a named repository bound to its model by naming convention.
///
/// The struct name is the repository name, so `UserRepository` binds model
/// `User` (table `user`). Optional keys, in this order, override the
/// convention: `folder`, `table`, `primary_key`. Each column listed under
/// `finders` gets `find_by_<col>`, `find_or_fail_by_<col>` and
/// `find_all_by_<col>` helpers.
///
/// The generated type derefs to [`SqliteRepository`](crate::repo::SqliteRepository),
/// so every [`Repository`](crate::repo::Repository) operation is available on it.
///
/// ```ignore
/// repokit_core::define_repository! {
///     pub struct UserRepository {
///         folder: "Admin",
///         finders: [email, status],
///     }
/// }
///
/// let users = UserRepository::try_new(&conn)?;
/// let active = users.find_all_by_status("active".to_string(), &OrderBy::default(), &Columns::All)?;
/// ```
#[macro_export]
macro_rules! define_repository {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(folder: $folder:literal,)?
            $(table: $table:literal,)?
            $(primary_key: $primary_key:literal,)?
            $(finders: [$($finder:ident),* $(,)?] $(,)?)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name<'conn> {
            repo: $crate::repo::SqliteRepository<'conn>,
        }

        impl<'conn> $name<'conn> {
            /// Repository name the model is derived from.
            pub const NAME: &'static str = stringify!($name);

            /// Configuration this repository is bound with.
            pub fn config() -> $crate::model::RepositoryConfig {
                #[allow(unused_mut)]
                let mut config = $crate::model::RepositoryConfig::for_repository(Self::NAME);
                $(config = config.model_folder($folder);)?
                $(config = config.table($table);)?
                $(config = config.primary_key($primary_key);)?
                config
            }

            /// Binds the conventional model on `conn`.
            pub fn try_new(
                conn: &'conn $crate::rusqlite::Connection,
            ) -> $crate::repo::RepoResult<Self> {
                Ok(Self {
                    repo: $crate::repo::SqliteRepository::try_new(conn, Self::config())?,
                })
            }

            pub fn into_inner(self) -> $crate::repo::SqliteRepository<'conn> {
                self.repo
            }
        }

        impl<'conn> ::core::ops::Deref for $name<'conn> {
            type Target = $crate::repo::SqliteRepository<'conn>;

            fn deref(&self) -> &Self::Target {
                &self.repo
            }
        }

        impl<'conn> ::core::ops::DerefMut for $name<'conn> {
            fn deref_mut(&mut self) -> &mut Self::Target {
                &mut self.repo
            }
        }

        $($crate::paste::paste! {
            impl<'conn> $name<'conn> {
                $(
                    pub fn [<find_by_ $finder>](
                        &self,
                        value: impl Into<$crate::Value>,
                        columns: &$crate::repo::Columns,
                    ) -> $crate::repo::RepoResult<Option<$crate::model::Record>> {
                        $crate::repo::Repository::find_by(
                            &self.repo,
                            stringify!($finder),
                            value,
                            columns,
                        )
                    }

                    pub fn [<find_or_fail_by_ $finder>](
                        &self,
                        value: impl Into<$crate::Value>,
                        columns: &$crate::repo::Columns,
                    ) -> $crate::repo::RepoResult<$crate::model::Record> {
                        $crate::repo::Repository::find_or_fail_by(
                            &self.repo,
                            stringify!($finder),
                            value,
                            columns,
                        )
                    }

                    pub fn [<find_all_by_ $finder>](
                        &self,
                        value: impl Into<$crate::Value>,
                        order_by: &$crate::repo::OrderBy,
                        columns: &$crate::repo::Columns,
                    ) -> $crate::repo::RepoResult<Vec<$crate::model::Record>> {
                        $crate::repo::Repository::find_all_by(
                            &self.repo,
                            stringify!($finder),
                            value,
                            order_by,
                            columns,
                        )
                    }
                )*
            }
        })?
    };
}
