use urlencoding::{decode, encode};

/// How public object URLs are formed for the configured store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlConvention {
    /// AWS S3: `https://{bucket}.s3.{region}.amazonaws.com/{key}`
    VirtualHosted { region: String },
    /// S3-compatible endpoint: `{endpoint}/{bucket}/{key}`
    PathStyle { endpoint: String },
}

impl UrlConvention {
    pub fn virtual_hosted(region: &str) -> Self {
        UrlConvention::VirtualHosted {
            region: region.to_string(),
        }
    }

    pub fn path_style(endpoint: &str) -> Self {
        UrlConvention::PathStyle {
            endpoint: endpoint.trim_end_matches('/').to_string(),
        }
    }

    pub fn object_url(&self, bucket: &str, key: &str) -> String {
        let path = encode_key(key);
        match self {
            UrlConvention::VirtualHosted { region } => {
                format!("https://{}.s3.{}.amazonaws.com/{}", bucket, region, path)
            }
            UrlConvention::PathStyle { endpoint } => {
                format!("{}/{}/{}", endpoint, bucket, path)
            }
        }
    }

    /// Inverse of [`UrlConvention::object_url`]: returns `(bucket, key)`.
    pub fn parse(&self, url: &str) -> Option<(String, String)> {
        let (bucket, path) = match self {
            UrlConvention::VirtualHosted { region } => {
                let rest = url.strip_prefix("https://")?;
                let (host, path) = rest.split_once('/')?;
                let bucket = host.strip_suffix(&format!(".s3.{}.amazonaws.com", region))?;
                (bucket, path)
            }
            UrlConvention::PathStyle { endpoint } => {
                let rest = url.strip_prefix(endpoint.as_str())?.strip_prefix('/')?;
                rest.split_once('/')?
            }
        };

        if bucket.is_empty() || path.is_empty() {
            return None;
        }

        Some((bucket.to_string(), decode_key(path)?))
    }
}

fn encode_key(key: &str) -> String {
    key.split('/')
        .map(|segment| encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

fn decode_key(path: &str) -> Option<String> {
    path.split('/')
        .map(|segment| decode(segment).ok().map(|s| s.into_owned()))
        .collect::<Option<Vec<_>>>()
        .map(|segments| segments.join("/"))
}
