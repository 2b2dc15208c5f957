// Configlet endpoints
//
// CRUD, search, history, and applied-device queries for configlets.
// Every response passes through the envelope check after decode; only
// fetch-by-name gives the service's not-found code special treatment.
// Update comes in two flavors: the synchronous one asks the service to
// enumerate spawned tasks before responding, the asynchronous one does
// not.

use serde_json::json;
use tracing::debug;

use crate::error::{Error, ServiceFault};
use crate::rest::client::CvpClient;
use crate::rest::models::{
    Configlet, ConfigletHistoryList, ConfigletList, ConfigletOpReturn, DeviceList, Envelope,
    ErrorResponse, UpdateReturn, ValidateReturn,
};

// ── Request builders ─────────────────────────────────────────────────
//
// One builder per POST endpoint. The service expects a different body
// shape for each: plain objects for create/update/validate, a batch
// list for delete.

fn add_request(name: &str, config: &str) -> serde_json::Value {
    json!({ "name": name, "config": config })
}

/// Delete accepts a batch; this client always submits a batch of one.
fn delete_request(name: &str, key: &str) -> serde_json::Value {
    json!([{ "name": name, "key": key }])
}

fn update_request(
    config: &str,
    name: &str,
    key: &str,
    wait_for_task_ids: bool,
) -> serde_json::Value {
    if wait_for_task_ids {
        json!({ "config": config, "key": key, "name": name, "waitForTaskIds": true })
    } else {
        json!({ "config": config, "key": key, "name": name })
    }
}

fn validate_request(serial_number: &str, config: &str) -> serde_json::Value {
    json!({ "config": config, "netElementId": serial_number })
}

impl CvpClient {
    /// Fetch a configlet by its unique name.
    ///
    /// `GET /web/configlet/getConfigletByName.do?name={name}`
    ///
    /// Returns `Ok(None)` when the service reports its "entity does not
    /// exist" code -- an absent configlet is an outcome, not an error.
    /// Any other embedded code is an error, and transport failures are
    /// never read as not-found.
    pub async fn get_configlet_by_name(&self, name: &str) -> Result<Option<Configlet>, Error> {
        const OP: &str = "get_configlet_by_name";

        debug!(name, "fetching configlet");

        let query = [("name", name.to_owned())];
        let info: Configlet = self
            .get_json(OP, "configlet/getConfigletByName.do", &query)
            .await?;

        if info.error_response().fault() == Some(ServiceFault::EntityNotFound) {
            debug!(name, "configlet not found");
            return Ok(None);
        }
        info.ensure_ok(OP)?;

        Ok(Some(info))
    }

    /// Fetch a page of a configlet's edit history.
    ///
    /// `GET /web/configlet/getConfigletHistory.do`
    ///
    /// `start == 0 && end == 0` requests the full history. Entries
    /// arrive in service order, newest first.
    pub async fn get_configlet_history(
        &self,
        key: &str,
        start: u32,
        end: u32,
    ) -> Result<ConfigletHistoryList, Error> {
        const OP: &str = "get_configlet_history";

        debug!(key, start, end, "fetching configlet history");

        let query = [
            ("configletId", key.to_owned()),
            ("queryparam", String::new()),
            ("startIndex", start.to_string()),
            ("endIndex", end.to_string()),
        ];
        let info: ConfigletHistoryList = self
            .get_json(OP, "configlet/getConfigletHistory.do", &query)
            .await?;
        info.ensure_ok(OP)?;

        Ok(info)
    }

    /// Fetch a configlet's entire edit history.
    pub async fn get_all_configlet_history(
        &self,
        key: &str,
    ) -> Result<ConfigletHistoryList, Error> {
        self.get_configlet_history(key, 0, 0).await
    }

    /// Create a configlet.
    ///
    /// `POST /web/configlet/addConfiglet.do`
    ///
    /// Returns the stored configlet, including its service-assigned
    /// key. Fails with an embedded error if the name is already taken.
    pub async fn add_configlet(&self, name: &str, config: &str) -> Result<Configlet, Error> {
        const OP: &str = "add_configlet";

        debug!(name, "creating configlet");

        let info: ConfigletOpReturn = self
            .post_json(OP, "configlet/addConfiglet.do", &add_request(name, config))
            .await?;
        info.ensure_ok(OP)?;

        info.data.ok_or_else(|| Error::Deserialization {
            operation: OP,
            message: "response envelope missing `data`".into(),
            body: String::new(),
        })
    }

    /// Delete a configlet.
    ///
    /// `POST /web/configlet/deleteConfiglet.do`
    ///
    /// `key` must match the identity of an existing configlet.
    pub async fn delete_configlet(&self, name: &str, key: &str) -> Result<(), Error> {
        const OP: &str = "delete_configlet";

        debug!(name, key, "deleting configlet");

        let info: ErrorResponse = self
            .post_json(
                OP,
                "configlet/deleteConfiglet.do",
                &delete_request(name, key),
            )
            .await?;
        info.ensure_ok(OP)?;

        Ok(())
    }

    /// Update a configlet and wait for the service to report any
    /// spawned tasks.
    ///
    /// `POST /web/configlet/updateConfiglet.do` with `waitForTaskIds: true`
    ///
    /// The service enumerates the device-reconfiguration tasks the
    /// update triggered before responding; the returned list is empty
    /// when no device work was required. This waits for task *creation*
    /// only, never completion -- the ids are the caller's to track.
    pub async fn update_configlet(
        &self,
        config: &str,
        name: &str,
        key: &str,
    ) -> Result<Vec<String>, Error> {
        const OP: &str = "update_configlet";

        debug!(name, key, "updating configlet (waiting for task ids)");

        let info: UpdateReturn = self
            .post_json(
                OP,
                "configlet/updateConfiglet.do",
                &update_request(config, name, key, true),
            )
            .await?;
        info.ensure_ok(OP)?;

        debug!(name, tasks = info.task_ids.len(), "update acknowledged");
        Ok(info.task_ids)
    }

    /// Update a configlet without waiting for task enumeration.
    ///
    /// Same endpoint as [`Self::update_configlet`] minus the
    /// `waitForTaskIds` flag: lower latency, no task visibility.
    pub async fn update_configlet_async(
        &self,
        config: &str,
        name: &str,
        key: &str,
    ) -> Result<(), Error> {
        const OP: &str = "update_configlet_async";

        debug!(name, key, "updating configlet (fire-and-forget)");

        let info: ErrorResponse = self
            .post_json(
                OP,
                "configlet/updateConfiglet.do",
                &update_request(config, name, key, false),
            )
            .await?;
        info.ensure_ok(OP)?;

        Ok(())
    }

    /// Validate configuration text against a device.
    ///
    /// `POST /web/configlet/validateConfig.do`
    ///
    /// `serial_number` identifies the device to validate against.
    pub async fn validate_config(
        &self,
        serial_number: &str,
        config: &str,
    ) -> Result<ValidateReturn, Error> {
        const OP: &str = "validate_config";

        debug!(serial_number, "validating config against device");

        let info: ValidateReturn = self
            .post_json(
                OP,
                "configlet/validateConfig.do",
                &validate_request(serial_number, config),
            )
            .await?;
        info.ensure_ok(OP)?;

        Ok(info)
    }

    /// List the devices a configlet is applied to.
    ///
    /// `GET /web/configlet/getAppliedDevices.do`
    ///
    /// Always requests the full page.
    pub async fn get_applied_devices(&self, name: &str) -> Result<DeviceList, Error> {
        const OP: &str = "get_applied_devices";

        debug!(name, "listing applied devices");

        let query = [
            ("configletName", name.to_owned()),
            ("queryparam", String::new()),
            ("startIndex", "0".to_owned()),
            ("endIndex", "0".to_owned()),
        ];
        let info: DeviceList = self
            .get_json(OP, "configlet/getAppliedDevices.do", &query)
            .await?;
        info.ensure_ok(OP)?;

        Ok(info)
    }

    /// Search configlets by text, with an explicit result range.
    ///
    /// `GET /web/configlet/searchConfiglets.do`
    ///
    /// `start == 0 && end == 0` requests the service's default page.
    /// Result order is relevance-ranked by the service; `total` counts
    /// all matches, not just the returned page.
    pub async fn search_configlets_with_range(
        &self,
        search: &str,
        start: u32,
        end: u32,
    ) -> Result<ConfigletList, Error> {
        const OP: &str = "search_configlets";

        debug!(search, start, end, "searching configlets");

        let query = [
            ("queryparam", search.to_owned()),
            ("startIndex", start.to_string()),
            ("endIndex", end.to_string()),
        ];
        let info: ConfigletList = self
            .get_json(OP, "configlet/searchConfiglets.do", &query)
            .await?;
        info.ensure_ok(OP)?;

        Ok(info)
    }

    /// Search configlets with the service's default result range.
    pub async fn search_configlets(&self, search: &str) -> Result<ConfigletList, Error> {
        self.search_configlets_with_range(search, 0, 0).await
    }
}
