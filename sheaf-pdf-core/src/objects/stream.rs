use crate::objects::{Dictionary, Object};

/// A stream object: a dictionary followed by raw bytes. `/Length` is kept
/// in sync with the data.
#[derive(Debug, Clone, PartialEq)]
pub struct Stream {
    dictionary: Dictionary,
    data: Vec<u8>,
}

impl Stream {
    pub fn new(data: Vec<u8>) -> Self {
        Self::with_dictionary(Dictionary::new(), data)
    }

    pub fn with_dictionary(dictionary: Dictionary, data: Vec<u8>) -> Self {
        let mut dict = dictionary;
        dict.set("Length", data.len() as i64);

        Self {
            dictionary: dict,
            data,
        }
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn set_filter(&mut self, filter: &str) {
        self.dictionary.set("Filter", Object::name(filter));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_tracks_data() {
        let stream = Stream::new(b"q\nQ\n".to_vec());
        assert_eq!(stream.dictionary().get("Length"), Some(&Object::Integer(4)));
        assert_eq!(stream.data(), b"q\nQ\n");
    }

    #[test]
    fn test_with_dictionary_overrides_length() {
        let mut dict = Dictionary::new();
        dict.set("Type", Object::name("XObject"));
        dict.set("Length", 999);

        let mut stream = Stream::with_dictionary(dict, vec![0u8; 10]);
        stream.set_filter("DCTDecode");

        assert_eq!(stream.dictionary().get("Length"), Some(&Object::Integer(10)));
        assert_eq!(
            stream.dictionary().get("Filter"),
            Some(&Object::name("DCTDecode"))
        );
    }
}
