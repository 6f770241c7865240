//! Request shapes used by the rest of the application

use super::descriptor::{RequestDescriptor, UploadPart};
use super::{ApiClient, ClientError};
use reqwest::Method;
use serde::{Serialize, de::DeserializeOwned};

impl ApiClient {
    /// Execute and deserialize the result into `T`
    pub async fn execute_as<T: DeserializeOwned>(
        &self,
        descriptor: &RequestDescriptor,
    ) -> Result<T, ClientError> {
        let value = self.execute(descriptor).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// GET without credentials
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.execute_as(&RequestDescriptor::public(Method::GET, path))
            .await
    }

    /// POST without credentials
    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let descriptor = RequestDescriptor::public(Method::POST, path).with_json(body)?;
        self.execute_as(&descriptor).await
    }

    pub async fn get_authenticated<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, ClientError> {
        self.execute_as(&RequestDescriptor::authenticated(Method::GET, path))
            .await
    }

    pub async fn post_authenticated<T, B>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let descriptor = RequestDescriptor::authenticated(Method::POST, path).with_json(body)?;
        self.execute_as(&descriptor).await
    }

    pub async fn put_authenticated<T, B>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let descriptor = RequestDescriptor::authenticated(Method::PUT, path).with_json(body)?;
        self.execute_as(&descriptor).await
    }

    pub async fn delete_authenticated<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, ClientError> {
        self.execute_as(&RequestDescriptor::authenticated(Method::DELETE, path))
            .await
    }

    /// DELETE carrying a JSON body, for APIs that identify the target in it
    pub async fn delete_authenticated_with_body<T, B>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let descriptor = RequestDescriptor::authenticated(Method::DELETE, path).with_json(body)?;
        self.execute_as(&descriptor).await
    }

    /// Multipart POST
    pub async fn upload<T: DeserializeOwned>(
        &self,
        path: &str,
        parts: Vec<UploadPart>,
    ) -> Result<T, ClientError> {
        let descriptor = RequestDescriptor::authenticated(Method::POST, path).with_parts(parts);
        self.execute_as(&descriptor).await
    }
}
