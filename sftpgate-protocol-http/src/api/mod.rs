use poem_openapi::OpenApi;

pub mod file_create;
pub mod file_delete;
pub mod file_detail;
pub mod files_list;

pub fn get() -> impl OpenApi {
    (
        files_list::Api,
        file_detail::Api,
        file_create::Api,
        file_delete::Api,
    )
}
